//! Page markup. Everything the stage draws hangs off one root `<div>` so that
//! dropping [`StageDom`] removes the whole page in one go.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

use super::clouds::Cloud;
use super::dodge::{Position, Size};
use crate::config::StageConfig;

pub const ROOT_ID: &str = "sc-root";

const STAGE_CSS: &str = "
@keyframes sc-wiggle { 0%,100% { transform: rotate(-5deg) } 50% { transform: rotate(5deg) } }
.sc-wiggle { animation: sc-wiggle 0.6s ease-in-out; }
@keyframes sc-floaty { 0%,100% { transform: translateY(0) } 50% { transform: translateY(-8px) } }
.sc-float { animation: sc-floaty 3s ease-in-out infinite; }
@keyframes sc-drift { from { transform: translateX(-20vw) } to { transform: translateX(120vw) } }
.sc-drift { position:absolute; left:0; animation-name: sc-drift; animation-timing-function: linear; animation-fill-mode: forwards; }
@keyframes sc-glow { 0%,100% { box-shadow: 0 0 10px rgba(251,191,36,.8) } 50% { box-shadow: 0 0 22px rgba(245,158,11,.9) } }
.sc-glow { animation: sc-glow 2s ease-in-out infinite; }
.sc-btn { border:none; border-radius:9999px; padding:8px 16px; font-weight:600; cursor:pointer; box-shadow:0 1px 3px rgba(0,0,0,.2); transition: transform 120ms; }
.sc-btn:active { transform: scale(0.95); }
#sc-mascot { cursor:pointer; user-select:none; filter: drop-shadow(0 10px 8px rgba(0,0,0,.15)); }
#sc-mascot:hover { scale: 1.1; }
";

const CLOUD_SVG: &str = r##"<svg viewBox="0 0 64 32" xmlns="http://www.w3.org/2000/svg" aria-hidden="true" style="width:100%;height:auto;display:block"><path d="M10 22c-4.5 0-8-3.6-8-8s3.5-8 8-8c2 0 3.8.7 5.2 1.9C16.4 4.3 19 3 22 3c5 0 9 4 9 9 0 .3 0 .6-.1.9C34.2 12.3 38 16 38 20c0 4.4-3.6 8-8 8H10z" fill="#87CEEB"/></svg>"##;

const MUSIC_ON_BG: &str = "#22c55e";
const MUSIC_OFF_BG: &str = "#ef4444";

pub struct StageDom {
    pub root: HtmlElement,
    pub cloud_layer: HtmlElement,
    pub play_area: HtmlElement,
    pub mascot_wrap: HtmlElement,
    pub mascot: HtmlImageElement,
    pub clicks: HtmlElement,
    pub quote: HtmlElement,
    pub music_btn: HtmlElement,
    pub quote_btn: HtmlElement,
    pub reset_btn: HtmlElement,
    pub laugh_btn: HtmlElement,
    doc: Document,
}

fn html(doc: &Document, tag: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element(tag)?.dyn_into()?;
    if !style.is_empty() {
        el.set_attribute("style", style)?;
    }
    Ok(el)
}

fn button(doc: &Document, label: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let b = html(doc, "button", style)?;
    b.set_class_name("sc-btn");
    b.set_text_content(Some(label));
    Ok(b)
}

impl StageDom {
    pub fn mount(doc: &Document, cfg: &StageConfig) -> Result<Self, JsValue> {
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

        let root = html(
            doc,
            "div",
            "position:relative; min-height:100vh; overflow:hidden; color:#1e293b; font-family:system-ui, sans-serif; background:linear-gradient(to bottom, #fef08a, #fed7aa, #fecaca);",
        )?;
        root.set_id(ROOT_ID);

        let style = doc.create_element("style")?;
        style.set_text_content(Some(STAGE_CSS));
        root.append_child(&style)?;

        let cloud_layer = html(
            doc,
            "div",
            "pointer-events:none; position:absolute; inset:0; overflow:hidden;",
        )?;
        cloud_layer.set_id("sc-clouds");
        root.append_child(&cloud_layer)?;

        // --- Navbar ---
        let nav = html(
            doc,
            "nav",
            "position:relative; z-index:10; margin:0 auto; max-width:64rem; display:flex; align-items:center; justify-content:space-between; padding:16px 20px;",
        )?;
        let title = html(
            doc,
            "h1",
            "user-select:none; font-size:1.5rem; font-weight:800; color:#b91c1c; margin:0;",
        )?;
        title.set_text_content(Some("Shinchan: The Real Hero"));
        nav.append_child(&title)?;
        let nav_buttons = html(doc, "div", "display:flex; gap:12px;")?;
        let music_btn = button(doc, "Play Music", "color:#fff;")?;
        music_btn.set_id("sc-music");
        let quote_btn = button(doc, "New Quote", "background:#fbbf24;")?;
        quote_btn.set_id("sc-new-quote");
        nav_buttons.append_child(&music_btn)?;
        nav_buttons.append_child(&quote_btn)?;
        nav.append_child(&nav_buttons)?;
        root.append_child(&nav)?;

        // --- Main stage ---
        let main = html(
            doc,
            "main",
            "position:relative; z-index:10; margin:0 auto; max-width:64rem; display:grid; grid-template-columns:repeat(auto-fit, minmax(300px, 1fr)); gap:32px; padding:24px 20px 64px;",
        )?;

        let section = html(
            doc,
            "section",
            &format!(
                "position:relative; height:{}px; border-radius:24px; background:rgba(255,192,203,.6); box-shadow:0 20px 25px rgba(0,0,0,.1);",
                cfg.play_area_height_px
            ),
        )?;
        // Inset play area (no padding) so offsets map directly to left/top.
        let play_area = html(doc, "div", "position:absolute; inset:16px;")?;
        play_area.set_id("sc-play-area");
        let mascot_wrap = html(
            doc,
            "div",
            &format!(
                "position:absolute; left:0px; top:0px; transition:left {t}ms ease, top {t}ms ease;",
                t = cfg.dodge.transition_ms
            ),
        )?;
        let mascot: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
        mascot.set_id("sc-mascot");
        mascot.set_alt("Shinchan");
        mascot.set_draggable(false);
        mascot.set_class_name("sc-float");
        mascot.set_attribute("style", &format!("width:{}px;", cfg.mascot_width_px))?;
        mascot.set_src(&cfg.mascot_src);
        mascot_wrap.append_child(&mascot)?;
        play_area.append_child(&mascot_wrap)?;
        section.append_child(&play_area)?;

        let hud = html(
            doc,
            "div",
            "position:absolute; bottom:16px; left:16px; border-radius:16px; background:rgba(255,255,255,.8); padding:12px; box-shadow:0 1px 3px rgba(0,0,0,.2);",
        )?;
        let clicks_line = html(doc, "p", "font-size:.875rem; font-weight:600; margin:0;")?;
        clicks_line.set_text_content(Some("Clicks: "));
        let clicks = html(doc, "span", "color:#dc2626;")?;
        clicks.set_id("sc-clicks");
        clicks.set_text_content(Some("0"));
        clicks_line.append_child(&clicks)?;
        let hint = html(doc, "p", "font-size:.75rem; color:#475569; margin:4px 0 0;")?;
        hint.set_text_content(Some(
            "Catch Shinchan using the cursor... he dodges😉 Click on him to hear his cute laugh",
        ));
        hud.append_child(&clicks_line)?;
        hud.append_child(&hint)?;
        section.append_child(&hud)?;
        main.append_child(&section)?;

        // --- Quote panel ---
        let panel = html(
            doc,
            "section",
            "display:flex; flex-direction:column; align-items:center; justify-content:center; gap:16px; border-radius:24px; background:rgba(255,255,255,.7); padding:24px; text-align:center; box-shadow:0 20px 25px rgba(0,0,0,.1);",
        )?;
        let bubble = html(
            doc,
            "div",
            "border-radius:24px; background:linear-gradient(to bottom right, #fff, #fef3c7); padding:20px;",
        )?;
        bubble.set_class_name("sc-glow");
        let quote = html(doc, "p", "font-size:1.125rem; font-weight:700; margin:0;")?;
        quote.set_id("sc-quote");
        bubble.append_child(&quote)?;
        panel.append_child(&bubble)?;
        let panel_buttons = html(
            doc,
            "div",
            "display:flex; flex-wrap:wrap; justify-content:center; gap:12px;",
        )?;
        let reset_btn = button(doc, "Reset Clicks", "background:#1e293b; color:#fff;")?;
        reset_btn.set_id("sc-reset");
        let laugh_btn = button(doc, "Play Laugh", "background:#ec4899; color:#fff;")?;
        laugh_btn.set_id("sc-laugh");
        panel_buttons.append_child(&reset_btn)?;
        panel_buttons.append_child(&laugh_btn)?;
        panel.append_child(&panel_buttons)?;
        let footnote = html(doc, "p", "margin-top:8px; font-size:.75rem; color:#475569;")?;
        footnote.set_text_content(Some(
            "Lets see how many times you catch Shinchan before resetting the click😉",
        ));
        panel.append_child(&footnote)?;
        main.append_child(&panel)?;
        root.append_child(&main)?;

        let footer = html(
            doc,
            "footer",
            "position:relative; z-index:10; padding-bottom:24px; text-align:center; font-size:.875rem; color:#334155;",
        )?;
        footer.set_text_content(Some("© MISHKAT FATMA"));
        root.append_child(&footer)?;

        body.append_child(&root)?;

        let dom = Self {
            root,
            cloud_layer,
            play_area,
            mascot_wrap,
            mascot,
            clicks,
            quote,
            music_btn,
            quote_btn,
            reset_btn,
            laugh_btn,
            doc: doc.clone(),
        };
        dom.set_music(false);
        Ok(dom)
    }

    /// Play-area interior; `None` until the root is attached to the document.
    pub fn area_size(&self) -> Option<Size> {
        measure(&self.play_area)
    }

    pub fn mascot_size(&self) -> Option<Size> {
        measure(&self.mascot)
    }

    pub fn set_position(&self, p: Position) {
        let style = self.mascot_wrap.style();
        let _ = style.set_property("left", &format!("{:.1}px", p.x));
        let _ = style.set_property("top", &format!("{:.1}px", p.y));
    }

    pub fn set_clicks(&self, clicks: u32) {
        self.clicks.set_text_content(Some(&clicks.to_string()));
    }

    pub fn set_quote(&self, quote: &str) {
        self.quote.set_text_content(Some(&format!("💭 {quote}")));
    }

    pub fn set_music(&self, on: bool) {
        self.music_btn
            .set_text_content(Some(if on { "Pause Music" } else { "Play Music" }));
        let _ = self
            .music_btn
            .style()
            .set_property("background", if on { MUSIC_ON_BG } else { MUSIC_OFF_BG });
    }

    pub fn set_wiggle(&self, on: bool) {
        self.mascot
            .set_class_name(if on { "sc-wiggle" } else { "sc-float" });
    }

    pub fn add_cloud(&self, cloud: &Cloud) -> Result<Element, JsValue> {
        let p = &cloud.params;
        let el = self.doc.create_element("div")?;
        el.set_id(&format!("sc-cloud-{}", cloud.id.raw()));
        el.set_class_name("sc-drift");
        el.set_attribute(
            "style",
            &format!(
                "top:{:.2}vh; width:{:.1}px; opacity:{:.2}; animation-duration:{:.2}s; animation-delay:{:.2}s;",
                p.top, p.size, p.opacity, p.duration, p.delay
            ),
        )?;
        el.set_inner_html(CLOUD_SVG);
        self.cloud_layer.append_child(&el)?;
        Ok(el)
    }
}

impl Drop for StageDom {
    fn drop(&mut self) {
        self.root.remove();
    }
}

fn measure(el: &HtmlElement) -> Option<Size> {
    if !el.is_connected() {
        return None;
    }
    Some(Size::new(el.offset_width() as f64, el.offset_height() as f64))
}
