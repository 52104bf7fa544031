fn warn(msg: &str) {
    println!(
        "cargo:warning={}",
        msg.replace('%', "%25").replace('\n', "%0A")
    );
}

fn main() {
    export_three_d_version();
    catalog::build();
}

fn export_three_d_version() {
    // Publish the resolved three-d version so the about window can show it
    // through option_env!.
    match cargo_metadata::MetadataCommand::new().exec() {
        Ok(metadata) => {
            let version = metadata
                .packages
                .into_iter()
                .find(|p| p.name == "three-d")
                .map(|p| p.version.to_string());

            match version {
                Some(ver) => println!("cargo:rustc-env=THREE_D_VERSION={ver}"),
                None => println!("cargo:rustc-env=THREE_D_VERSION=unknown"),
            }
        }
        Err(e) => {
            warn(&format!("failed to query cargo metadata: {e}"));
            println!("cargo:rustc-env=THREE_D_VERSION=unknown");
        }
    }
}

mod catalog {
    use std::{
        env,
        fmt::Display,
        fs::{self, File},
        io::Write,
        path::PathBuf,
    };

    use toml::{
        Spanned,
        de::{DeArray, DeInteger, DeTable, DeValue},
    };

    const CATALOG_TOML_PATH: &str = "src/sim/catalog.toml";
    const OUTPUT_FILE_NAME: &str = "catalog.rs";

    const KEY_SUN: &str = "sun";
    const KEY_BODY: &str = "body";

    const KEY_NAME: &str = "name";
    const KEY_RADIUS: &str = "radius";
    const KEY_DISTANCE: &str = "distance";
    const KEY_AU: &str = "au";
    const KEY_MILLION_KM: &str = "million_km";
    const KEY_SPEED: &str = "speed";
    const KEY_AXIAL_RATE: &str = "axial_rate";
    const KEY_COLOR: &str = "color";
    const KEY_RING: &str = "ring";
    const KEY_RING_INNER: &str = "inner";
    const KEY_RING_OUTER: &str = "outer";
    const KEY_RING_TILT: &str = "tilt";

    struct RingCreator {
        inner: f64,
        outer: f64,
        tilt: f64,
    }

    struct BodyCreator<'a> {
        name: &'a str,
        radius: f64,
        distance: f64,
        au: f64,
        million_km: f64,
        speed: f64,
        color: [u8; 3],
        ring: Option<RingCreator>,
    }

    pub(super) fn build() {
        println!("cargo:rerun-if-changed={CATALOG_TOML_PATH}");

        let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR should be set by cargo");
        let output_path = PathBuf::from(out_dir).join(OUTPUT_FILE_NAME);
        let mut output_file =
            File::create(output_path).expect("failed to initialize output file writer");
        print_header(&mut output_file);

        let catalog_string =
            fs::read_to_string(CATALOG_TOML_PATH).expect("failed to read from catalog file");
        let table = DeTable::parse(&catalog_string).expect("failed to parse catalog file as table");
        let table = table.get_ref();

        process_sun(expect_table(expect_exists(table, KEY_SUN, KEY_SUN), KEY_SUN), &mut output_file);

        let bodies = match expect_exists(table, "catalog", KEY_BODY).get_ref() {
            DeValue::Array(bodies) => bodies,
            v => panic!("catalog builder: expected [[{KEY_BODY}]] array of tables, found {v:?}"),
        };
        process_bodies(bodies, &mut output_file);
    }

    fn print_header(file: &mut File) {
        file.write_all(
            b"// Generated by build.rs::catalog\n",
        )
        .expect("failed to write to output file");
    }

    fn process_sun(map: &DeTable, file: &mut File) {
        let radius = get_positive_required(map, KEY_SUN, KEY_RADIUS);
        let axial_rate = get_float_required(map, KEY_SUN, KEY_AXIAL_RATE);
        let [color_r, color_g, color_b] = get_srgb_required(map, KEY_SUN, KEY_COLOR);

        let code = format!(
            "
/// The star at the center of the system.
#[allow(clippy::excessive_precision)]
pub const SUN: SunEntry = SunEntry {{
    radius: {radius:.20e},
    axial_rate: {axial_rate:.20e},
    color: [{color_r}, {color_g}, {color_b}],
}};
"
        );
        file.write_all(code.as_bytes())
            .expect("failed to write to output file");
    }

    fn process_bodies(bodies: &DeArray<'_>, file: &mut File) {
        let mut names: Vec<String> = Vec::with_capacity(bodies.len());
        let mut code = String::from(
            "
/// Every orbiting body, ordered by distance from the sun.
#[allow(clippy::excessive_precision)]
pub const CATALOG: &[CatalogEntry] = &[",
        );

        for i in 0..bodies.len() {
            let entry_name = format!("{KEY_BODY}[{i}]");
            let map = expect_table(&bodies[i], &entry_name);
            let creator = process_entry(map, &entry_name);

            if names.iter().any(|n| n == creator.name) {
                panic!(
                    "catalog builder: {entry_name}: duplicate body name {}",
                    creator.name
                );
            }
            names.push(creator.name.to_owned());

            code += &meta_create_entry(&creator);
        }

        if names.is_empty() {
            panic!("catalog builder: catalog must contain at least one [[{KEY_BODY}]]");
        }

        code += "\n];\n";
        file.write_all(code.as_bytes())
            .expect("failed to write to output file");
    }

    fn process_entry<'a>(map: &'a DeTable, entry_name: &str) -> BodyCreator<'a> {
        let name = get_str_required(map, entry_name, KEY_NAME);
        if !is_string_snake_case(name) {
            panic!("catalog builder: {entry_name}: name {name:?} should be lowercase snake_case");
        }

        let radius = get_positive_required(map, entry_name, KEY_RADIUS);
        let distance = get_positive_required(map, entry_name, KEY_DISTANCE);
        let au = get_positive_required(map, entry_name, KEY_AU);
        let million_km = get_positive_required(map, entry_name, KEY_MILLION_KM);
        let speed = get_float_required(map, entry_name, KEY_SPEED);
        if speed < 0.0 {
            panic!("catalog builder: {entry_name}: {KEY_SPEED} must not be negative");
        }
        let color = get_srgb_required(map, entry_name, KEY_COLOR);

        let ring = map.get(KEY_RING).map(|value| {
            let ring_name = format!("{entry_name}.{KEY_RING}");
            let ring = expect_table(value, &ring_name);
            let inner = get_positive_required(ring, &ring_name, KEY_RING_INNER);
            let outer = get_positive_required(ring, &ring_name, KEY_RING_OUTER);
            if outer <= inner {
                panic!("catalog builder: {ring_name}: {KEY_RING_OUTER} must exceed {KEY_RING_INNER}");
            }
            let tilt = get_float_optional(ring, &ring_name, KEY_RING_TILT).unwrap_or(0.0);
            RingCreator { inner, outer, tilt }
        });

        BodyCreator {
            name,
            radius,
            distance,
            au,
            million_km,
            speed,
            color,
            ring,
        }
    }

    fn meta_create_entry(creator: &BodyCreator) -> String {
        let BodyCreator {
            name,
            radius,
            distance,
            au,
            million_km,
            speed,
            color,
            ring,
        } = creator;
        let [color_r, color_g, color_b] = color;
        let ring = match ring {
            Some(RingCreator { inner, outer, tilt }) => format!(
                "Some(RingSpec {{ inner: {inner:.20e}, outer: {outer:.20e}, tilt: {tilt:.20e} }})"
            ),
            None => String::from("None"),
        };

        format!(
            "
    CatalogEntry {{
        name: \"{name}\",
        radius: {radius:.20e},
        orbit_distance: {distance:.20e},
        au: {au:.20e},
        physical_distance: {million_km:.20e},
        default_speed: {speed:.20e},
        color: [{color_r}, {color_g}, {color_b}],
        ring: {ring},
    }},"
        )
    }

    fn is_string_snake_case(string: &str) -> bool {
        !string.is_empty()
            && string
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    fn expect_exists<'a>(
        map: &'a DeTable,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> &'a Spanned<DeValue<'a>> {
        let Some(val) = map.get(key_name) else {
            panic!("catalog builder: {entry_name}: missing required field {key_name}");
        };
        val
    }

    fn expect_table<'a>(
        val: &'a Spanned<DeValue<'a>>,
        entry_name: (impl AsRef<str> + Display),
    ) -> &'a DeTable<'a> {
        match val.get_ref() {
            DeValue::Table(map) => map,
            v => panic!("catalog builder: parsing {entry_name}: expected table, found {v:?}"),
        }
    }

    fn get_str_required<'a>(
        map: &'a DeTable,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> &'a str {
        let val = expect_exists(map, entry_name.as_ref(), key_name);
        let Some(val) = val.get_ref().as_str() else {
            panic!("catalog builder: {entry_name}: expected field {key_name} to be string");
        };
        val
    }

    fn get_float_required(
        map: &DeTable,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> f64 {
        expect_float(expect_exists(map, &entry_name, key_name), entry_name, key_name)
    }

    fn get_positive_required(
        map: &DeTable,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> f64 {
        let val = get_float_required(map, &entry_name, key_name);
        if !(val > 0.0) {
            panic!("catalog builder: {entry_name}: expected field {key_name} to be positive, got {val}");
        }
        val
    }

    fn get_float_optional(
        map: &DeTable,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> Option<f64> {
        let val = map.get(key_name)?;
        Some(expect_float(val, entry_name, key_name))
    }

    fn expect_float(
        val: &Spanned<DeValue<'_>>,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> f64 {
        let Some(val) = val.get_ref().as_float() else {
            panic!("catalog builder: {entry_name}: expected field {key_name} to be float");
        };
        match val.as_str().parse() {
            Ok(f) => f,
            Err(e) => {
                panic!("catalog builder: {entry_name}: failed to parse field {key_name} as float: {e}")
            }
        }
    }

    fn get_srgb_required(
        map: &DeTable,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> [u8; 3] {
        expect_srgb(expect_exists(map, &entry_name, key_name), entry_name, key_name)
    }

    fn expect_srgb(
        val: &Spanned<DeValue<'_>>,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> [u8; 3] {
        match val.get_ref() {
            DeValue::Integer(de_integer) => srgb_from_int(de_integer, entry_name, key_name),
            DeValue::Array(de_array) => srgb_from_array(de_array, entry_name, key_name),
            _ => {
                panic!(
                    "catalog builder: {entry_name}: expected field {key_name} \
                    to be either a 3-element integer array or an integer"
                );
            }
        }
    }

    fn srgb_from_int(
        val: &DeInteger<'_>,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> [u8; 3] {
        const SRGB_BITS: u32 = u8::BITS * 3;
        const SRGB_MAX_VALUE: u32 = (1 << SRGB_BITS) - 1;

        let val = match u32::from_str_radix(val.as_str(), val.radix()) {
            Ok(v) => v,
            Err(e) => {
                panic!(
                    "catalog builder: {entry_name}: expected integer {key_name} to fit in 24 bits, got error {e}"
                );
            }
        };

        if val > SRGB_MAX_VALUE {
            panic!(
                "catalog builder: {entry_name}: expected integer {key_name} to fit in 24 bits\n\
                ...max 24-bit number: {SRGB_MAX_VALUE} = 0x{SRGB_MAX_VALUE:X}\n\
                ...got value: {val} = 0x{val:X}"
            );
        }

        let [_, rgb @ ..] = val.to_be_bytes();
        rgb
    }

    fn srgb_from_array(
        val: &DeArray<'_>,
        entry_name: (impl AsRef<str> + Display),
        key_name: &str,
    ) -> [u8; 3] {
        if val.len() != 3 {
            panic!(
                "catalog builder: {entry_name}: expected array {key_name} to have 3 elements, got {}",
                val.len()
            );
        }

        core::array::from_fn(|i| {
            let Some(val) = val[i].get_ref().as_integer() else {
                panic!("catalog builder: {entry_name}: expected {key_name}[{i}] to be u8");
            };

            match u8::from_str_radix(val.as_str(), val.radix()) {
                Ok(v) => v,
                Err(e) => panic!(
                    "catalog builder: {entry_name}: expected {key_name}[{i}] to fit in u8, got error {e}"
                ),
            }
        })
    }
}
