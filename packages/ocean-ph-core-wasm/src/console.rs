#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// Browser console bindings
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    // Use `js_namespace` to bind `console.log(..)` instead of just `log(..)`
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn error(s: &str);
}

// Native builds (unit tests, tooling) have no console object, so log to stderr
#[cfg(not(target_arch = "wasm32"))]
pub fn log(s: &str) {
    eprintln!("[log] {}", s);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(s: &str) {
    eprintln!("[warn] {}", s);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(s: &str) {
    eprintln!("[error] {}", s);
}

// Note: The console_* macros are defined in lib.rs to avoid duplication
