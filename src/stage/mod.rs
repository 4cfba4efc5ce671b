//! The stage: mascot, drifting clouds and HUD mounted into the page.
//!
//! All runtime state lives in one thread-local [`Stage`]. Browser callbacks
//! (frame loop, DOM listeners, resolved audio promises) reach it through
//! [`with_stage`] and do nothing once it is gone. Dropping the stage is the
//! teardown: timers are cancelled, the animation frame is cancelled, listeners
//! are detached, music stops and the markup is removed.
//!
//! Timers are virtual (see [`scheduler`]); the frame loop pumps them with the
//! `requestAnimationFrame` timestamp.

pub mod audio;
pub mod clouds;
pub mod dodge;
pub mod dom;
pub mod hud;
pub mod scheduler;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, EventTarget, window};

use crate::QUOTES;
use crate::config::StageConfig;
use audio::{Track, settle};
use clouds::{CloudChange, CloudField, CloudId};
use dodge::DodgePositioner;
use dom::StageDom;
use hud::Hud;

pub use clouds::{Cloud, CloudParams, remaining_lifetime};
pub use dodge::{Position, Size};

/// Runtime stage state.
struct Stage {
    session: u64,
    clouds: CloudField,
    cloud_nodes: HashMap<CloudId, Element>,
    dodge: DodgePositioner,
    hud: Hud,
    rng: SmallRng,
    music: Track,
    laugh: Track,
    // Teardown order matters: frame + listeners go before the markup.
    frame: Option<FrameLoop>,
    listeners: Vec<Listener>,
    dom: StageDom,
}

impl Stage {
    fn frame(&mut self, now: f64) {
        let changes = self.clouds.advance(now, &mut self.rng);
        self.apply_cloud_changes(changes);
        if self.hud.advance(now) {
            self.dom.set_wiggle(self.hud.wiggling());
        }
    }

    fn apply_cloud_changes(&mut self, changes: Vec<CloudChange>) {
        for change in changes {
            match change {
                CloudChange::Spawned(cloud) => match self.dom.add_cloud(&cloud) {
                    Ok(node) => {
                        self.cloud_nodes.insert(cloud.id, node);
                    }
                    Err(err) => console_debug!("cloud {} not drawn: {err:?}", cloud.id.raw()),
                },
                CloudChange::Removed(id) => {
                    if let Some(node) = self.cloud_nodes.remove(&id) {
                        node.remove();
                    }
                }
            }
        }
    }

    fn recenter(&mut self) {
        if let Some(p) = self
            .dodge
            .recenter(self.dom.area_size(), self.dom.mascot_size())
        {
            self.dom.set_position(p);
        }
    }

    fn dodge(&mut self) {
        if let Some(p) = self
            .dodge
            .dodge(self.dom.area_size(), self.dom.mascot_size(), &mut self.rng)
        {
            self.dom.set_position(p);
        }
    }

    fn quote(&self) -> &'static str {
        QUOTES.get(self.hud.quote_index()).copied().unwrap_or_default()
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.clouds.shutdown();
        self.hud.shutdown();
        drop(self.frame.take());
        self.listeners.clear();
        console_debug!("stage {} torn down", self.session);
    }
}

thread_local! {
    static STAGE: RefCell<Option<Stage>> = const { RefCell::new(None) };
    static NEXT_SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Run `f` against the live stage. `None` if there is no stage or it is
/// already borrowed further up the stack.
fn with_stage<T>(f: impl FnOnce(&mut Stage) -> T) -> Option<T> {
    STAGE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            console_debug!("stage busy; event skipped");
            return None;
        };
        slot.as_mut().map(f)
    })
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Browser plumbing --------------------------------------------------------

/// DOM event listener removed again on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        f: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop, cancelled on drop.
struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<i32>>,
}

impl FrameLoop {
    fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let handle = Rc::new(Cell::new(0));
        let h = handle.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            on_frame(ts);
            if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
                if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    h.set(id);
                }
            }
        }) as Box<dyn FnMut(f64)>));
        if let Some(cb) = g.borrow().as_ref() {
            handle.set(win.request_animation_frame(cb.as_ref().unchecked_ref())?);
        }
        Ok(Self {
            callback: g,
            handle,
        })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(w) = window() {
            let _ = w.cancel_animation_frame(self.handle.get());
        }
        // Dropping the closure also breaks the Rc cycle it holds on itself.
        self.callback.borrow_mut().take();
    }
}

fn seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    let r = js_sys::Math::random() * u64::MAX as f64;
    (r as u64) ^ (js_sys::Date::now() as u64)
}

// --- Event handlers ------------------------------------------------------------

fn on_mascot_click() {
    let play = with_stage(|st| {
        st.hud.register_click(now_ms());
        st.dom.set_clicks(st.hud.clicks());
        st.dom.set_wiggle(st.hud.wiggling());
        st.laugh.play()
    })
    .flatten();
    if play.is_some() {
        spawn_local(async move {
            settle(play).await;
        });
    }
}

fn on_toggle_music() {
    let pending = with_stage(|st| {
        if st.hud.music_on() {
            st.music.pause();
            st.hud.set_music_on(false);
            st.dom.set_music(false);
            None
        } else {
            st.music.play().map(|p| (st.session, p))
        }
    })
    .flatten();
    let Some((session, play)) = pending else {
        return;
    };
    spawn_local(async move {
        if settle(Some(play)).await {
            // The stage may have been restarted while the promise was pending.
            with_stage(|st| {
                if st.session == session {
                    st.hud.set_music_on(true);
                    st.dom.set_music(true);
                }
            });
        }
    });
}

fn on_new_quote() {
    with_stage(|st| {
        st.hud.next_quote(QUOTES.len(), &mut st.rng);
        st.dom.set_quote(st.quote());
    });
}

fn on_reset_clicks() {
    with_stage(|st| {
        st.hud.reset_clicks();
        st.dom.set_clicks(0);
    });
}

fn on_play_laugh() {
    let play = with_stage(|st| st.laugh.play()).flatten();
    if play.is_some() {
        spawn_local(async move {
            settle(play).await;
        });
    }
}

fn attach_listeners(win: &web_sys::Window, dom: &StageDom) -> Result<Vec<Listener>, JsValue> {
    Ok(vec![
        Listener::new(win, "resize", |_| {
            with_stage(Stage::recenter);
        })?,
        Listener::new(&dom.mascot, "load", |_| {
            with_stage(Stage::recenter);
        })?,
        Listener::new(&dom.mascot, "mouseenter", |_| {
            with_stage(Stage::dodge);
        })?,
        Listener::new(&dom.mascot, "click", |_| on_mascot_click())?,
        Listener::new(&dom.music_btn, "click", |_| on_toggle_music())?,
        Listener::new(&dom.quote_btn, "click", |_| on_new_quote())?,
        Listener::new(&dom.reset_btn, "click", |_| on_reset_clicks())?,
        Listener::new(&dom.laugh_btn, "click", |_| on_play_laugh())?,
    ])
}

// --- Entry points ----------------------------------------------------------------

pub fn start(cfg: StageConfig) -> Result<(), JsValue> {
    stop();
    crate::log::set_debug(cfg.debug);

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let dom = StageDom::mount(&doc, &cfg)?;
    let listeners = attach_listeners(&win, &dom)?;
    let frame = FrameLoop::start(|ts| {
        with_stage(|st| st.frame(ts));
    })?;

    let session = NEXT_SESSION.with(|n| {
        let s = n.get();
        n.set(s + 1);
        s
    });
    let now = now_ms();
    let mut stage = Stage {
        session,
        clouds: CloudField::new(cfg.clouds.clone()),
        cloud_nodes: HashMap::new(),
        dodge: DodgePositioner::new(cfg.dodge.margin_px),
        hud: Hud::new(cfg.wiggle_ms),
        rng: SmallRng::seed_from_u64(seed()),
        music: Track::load(&cfg.audio.music_src, cfg.audio.music_volume, true),
        laugh: Track::load(&cfg.audio.laugh_src, cfg.audio.laugh_volume, false),
        frame: Some(frame),
        listeners,
        dom,
    };
    let initial = stage.clouds.start(now, &mut stage.rng);
    stage.apply_cloud_changes(initial);
    stage.dom.set_quote(stage.quote());
    stage.recenter();

    console_log!(
        "stage {session} started with {} clouds",
        stage.clouds.len()
    );
    STAGE.with(|cell| cell.replace(Some(stage)));
    Ok(())
}

pub fn stop() {
    // Take the stage out first so its Drop runs without the cell borrowed.
    let old = STAGE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    });
    drop(old);
}

pub fn running() -> bool {
    STAGE.with(|cell| cell.try_borrow().map(|s| s.is_some()).unwrap_or(true))
}
