use std::{
    fmt::{self, Write},
    panic::PanicHookInfo,
    sync::Mutex,
};

use wasm_bindgen::JsValue;

// A panic may come from running out of memory, so the message is formatted
// into static space instead of a fresh String.
const PANIC_BUFFER_LEN: usize = 16384;
type PanicBuffer = [u8; PANIC_BUFFER_LEN];
static PANIC_BUFFER: Mutex<PanicBuffer> = Mutex::new([0; PANIC_BUFFER_LEN]);

/// Formats into a fixed buffer, silently truncating on overflow.
struct BufWriter<'a> {
    buffer: &'a mut PanicBuffer,
    len: usize,
}

impl<'a> BufWriter<'a> {
    fn new(buffer: &'a mut PanicBuffer) -> Self {
        Self { buffer, len: 0 }
    }

    fn as_str(&self) -> &str {
        let bytes = &self.buffer[..self.len];
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            // Truncation may have split a character.
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or("[unrecoverable]"),
        }
    }
}

impl Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let free = PANIC_BUFFER_LEN - self.len;
        let count = s.len().min(free);
        self.buffer[self.len..self.len + count].copy_from_slice(&s.as_bytes()[..count]);
        self.len += count;
        Ok(())
    }
}

enum PanicDisplayError {
    GetWindowError,
    GetDocumentError,
    GetBodyError,
    CreateDialogError(JsValue),
    AttachDialogError(JsValue),
}

impl fmt::Display for PanicDisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetWindowError => write!(f, "error getting window"),
            Self::GetDocumentError => write!(f, "error getting document"),
            Self::GetBodyError => write!(f, "error getting body"),
            Self::CreateDialogError(_) => write!(f, "error creating dialog"),
            Self::AttachDialogError(_) => write!(f, "error attaching dialog"),
        }
    }
}

pub(crate) fn init_panic_handler() {
    std::panic::set_hook(Box::new(handle_panic));
}

fn handle_panic(info: &PanicHookInfo<'_>) {
    let mut panic_buffer = match PANIC_BUFFER.lock() {
        Ok(l) => l,
        Err(p) => p.into_inner(),
    };
    let mut writer = BufWriter::new(&mut panic_buffer);
    let _ = write_panic_info(&mut writer, info);
    let message = writer.as_str();

    web_sys::console::error_1(&JsValue::from_str(message));

    if let Err(e) = display_panic(message) {
        let mut reason = String::new();
        let _ = write!(reason, "failed to display panic info in GUI: {e}");
        let reason = JsValue::from_str(&reason);
        match e {
            PanicDisplayError::CreateDialogError(v) | PanicDisplayError::AttachDialogError(v) => {
                web_sys::console::error_2(&reason, &v)
            }
            _ => web_sys::console::error_1(&reason),
        }
    }
}

fn write_panic_info(writer: &mut impl Write, info: &PanicHookInfo<'_>) -> fmt::Result {
    writer.write_str("panicked at ")?;
    match info.location() {
        Some(l) => write!(writer, "{}:{}:{}", l.file(), l.line(), l.column())?,
        None => writer.write_str("?")?,
    }

    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        write!(writer, ":\n{s}")?;
    } else if let Some(s) = payload.downcast_ref::<String>() {
        write!(writer, ":\n{s}")?;
    }
    Ok(())
}

fn display_panic(message: &str) -> Result<(), PanicDisplayError> {
    let window = web_sys::window().ok_or(PanicDisplayError::GetWindowError)?;
    let document = window
        .document()
        .ok_or(PanicDisplayError::GetDocumentError)?;

    let dialog = document
        .create_element("dialog")
        .map_err(PanicDisplayError::CreateDialogError)?;
    let _ = dialog.set_attribute("open", "true");

    let body = document.body().ok_or(PanicDisplayError::GetBodyError)?;
    body.append_child(&dialog)
        .map_err(PanicDisplayError::AttachDialogError)?;

    if let Ok(h1) = document.create_element("h1") {
        h1.set_text_content(Some("Panic!"));
        let _ = dialog.append_child(&h1);
    }

    if let Ok(p) = document.create_element("p") {
        p.set_text_content(Some(
            "A catastrophic error occurred and the solar system cannot continue. \
            Below are details on the error, which you can report to the developer. \
            Opening the console may reveal additional details.",
        ));
        let _ = dialog.append_child(&p);
    }

    match document.create_element("pre") {
        Ok(pre) if dialog.append_child(&pre).is_ok() => pre.set_text_content(Some(message)),
        _ => dialog.set_text_content(Some(message)),
    }

    if let Ok(button) = document.create_element("button") {
        button.set_text_content(Some("Dismiss"));
        if button
            .set_attribute("onclick", "this.parentElement.close()")
            .is_ok()
        {
            let _ = dialog.append_child(&button);
        }
    }

    Ok(())
}
