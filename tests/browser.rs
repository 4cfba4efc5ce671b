// Browser smoke test: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn doc() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn start_mounts_and_stop_removes() {
    shinchan_stage::start_stage().unwrap();
    assert!(shinchan_stage::stage_running());
    let d = doc();
    assert!(d.get_element_by_id("sc-root").is_some());
    assert!(d.get_element_by_id("sc-mascot").is_some());
    let clouds = d.get_element_by_id("sc-clouds").unwrap();
    assert_eq!(clouds.child_element_count(), 10);

    shinchan_stage::stop_stage();
    assert!(!shinchan_stage::stage_running());
    assert!(d.get_element_by_id("sc-root").is_none());
}

#[wasm_bindgen_test]
fn restart_replaces_previous_stage() {
    shinchan_stage::start_stage().unwrap();
    shinchan_stage::start_stage().unwrap();
    // The first root went away on restart, so one stop leaves nothing behind.
    shinchan_stage::stop_stage();
    assert!(doc().get_element_by_id("sc-root").is_none());
}
