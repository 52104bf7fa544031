use wasm_bindgen::prelude::wasm_bindgen;

mod panic_handler;

// Called when the WASM module is instantiated
#[wasm_bindgen(start)]
fn start() {
    panic_handler::init_panic_handler();
    crate::run();
}
