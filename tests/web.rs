// Browser-side smoke tests. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_and_stop_in_browser() {
    color_squares::start_game().expect("start");
    color_squares::stop_game();
    color_squares::stop_game();
}

#[wasm_bindgen_test]
fn config_setters_validate() {
    assert!(color_squares::set_speed("fast").is_ok());
    assert!(color_squares::set_speed("ludicrous").is_err());
    assert!(color_squares::set_attempt_limit(15).is_ok());
    assert!(color_squares::set_attempt_limit(3).is_err());
}
