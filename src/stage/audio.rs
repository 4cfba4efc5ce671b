//! Thin wrapper over `<audio>` elements.
//!
//! Browsers reject `play()` until the user has interacted with the page, and a
//! missing file rejects too. Both come back as a failed promise which callers
//! treat as "nothing happened".

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

pub struct Track {
    el: Option<HtmlAudioElement>,
}

impl Track {
    /// Build the element; a failure leaves an inert track.
    pub fn load(src: &str, volume: f64, looping: bool) -> Self {
        let el = match HtmlAudioElement::new_with_src(src) {
            Ok(el) => {
                el.set_loop(looping);
                el.set_volume(volume.clamp(0.0, 1.0));
                Some(el)
            }
            Err(err) => {
                console_log!("audio {src} unavailable: {err:?}");
                None
            }
        };
        Self { el }
    }

    /// Returns the platform play promise, or `None` when playback could not even
    /// be requested.
    pub fn play(&self) -> Option<JsFuture> {
        let el = self.el.as_ref()?;
        match el.play() {
            Ok(promise) => Some(JsFuture::from(promise)),
            Err(err) => {
                console_debug!("play() threw: {err:?}");
                None
            }
        }
    }

    pub fn pause(&self) {
        if let Some(el) = &self.el {
            if let Err(err) = el.pause() {
                console_debug!("pause() threw: {err:?}");
            }
        }
    }
}

impl Drop for Track {
    fn drop(&mut self) {
        self.pause();
    }
}

/// Await a play request; `true` only if playback actually started.
pub async fn settle(play: Option<JsFuture>) -> bool {
    let Some(fut) = play else {
        return false;
    };
    match fut.await {
        Ok(_) => true,
        Err(err) => {
            console_debug!("playback rejected: {err:?}");
            false
        }
    }
}
