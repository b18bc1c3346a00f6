use wasm_bindgen::JsValue;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = commercial_cover::app::install() {
        web_sys::console::error_1(&JsValue::from_str(&format!(
            "commercial cover failed to start: {}",
            err
        )));
    }
}
