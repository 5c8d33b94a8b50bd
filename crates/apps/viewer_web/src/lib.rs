use console_error_panic_hook::set_once;
use wasm_bindgen::prelude::*;

use scene::GlobeConfig;

mod app;
mod web;
mod wgpu;

pub use app::GlobeApp;

#[wasm_bindgen(start)]
pub fn start() {
    set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

/// Parse the optional JSON config passed from the page.
pub fn parse_config(config_json: Option<&str>) -> Result<GlobeConfig, JsValue> {
    match config_json {
        None => Ok(GlobeConfig::default()),
        Some(text) if text.trim().is_empty() => Ok(GlobeConfig::default()),
        Some(text) => GlobeConfig::from_json(text).map_err(|e| JsValue::from_str(&e.to_string())),
    }
}

/// Mount the globe into `container_id`, drawing into the first element
/// matching `canvas_selector`.
///
/// Returns `undefined` when either element is missing.
#[wasm_bindgen]
pub fn mount_globe(
    container_id: &str,
    canvas_selector: &str,
    config_json: Option<String>,
) -> Result<Option<GlobeHandle>, JsValue> {
    let cfg = parse_config(config_json.as_deref())?;
    let mounted = web::mount(container_id, canvas_selector, cfg)?;
    Ok(mounted.map(|inner| GlobeHandle { inner }))
}

#[wasm_bindgen]
pub struct GlobeHandle {
    inner: web::Mounted,
}

#[wasm_bindgen]
impl GlobeHandle {
    /// Stop the frame loop, cancel pending timers and tweens, and remove
    /// every listener. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    #[wasm_bindgen(js_name = dotCount)]
    pub fn dot_count(&self) -> u32 {
        self.inner.dot_count() as u32
    }

    #[wasm_bindgen(js_name = isDisposed)]
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(parse_config(None).ok(), Some(GlobeConfig::default()));
        assert_eq!(parse_config(Some("  ")).ok(), Some(GlobeConfig::default()));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg = parse_config(Some(r#"{"camera": {"breakpoint_px": 900}}"#))
            .ok()
            .expect("valid config");
        assert_eq!(cfg.camera.breakpoint_px, 900.0);
        assert_eq!(cfg.camera.near_distance, 100.0);
        assert_eq!(cfg.dots, GlobeConfig::default().dots);
    }

    #[test]
    fn host_mount_finds_no_dom() {
        let mounted = mount_globe("globe", "#globe canvas", None).ok();
        assert!(matches!(mounted, Some(None)));
    }
}
