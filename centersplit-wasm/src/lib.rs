use centersplit_core::{
    SampleBuffer, Separation, SeparationEvent, SeparationListener, Separator, SeparatorConfig,
    StemKind, WaveformPeaks,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// ─── Separation API ─────────────────────────────────────────────────────────

/// Output of [`separate`]: normalized samples and WAV bytes for both tracks.
#[wasm_bindgen]
pub struct SeparationResult {
    inner: Separation,
}

#[wasm_bindgen]
impl SeparationResult {
    #[wasm_bindgen(getter)]
    pub fn num_channels(&self) -> u32 {
        self.inner.vocals.buffer.num_channels() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn sample_rate(&self) -> u32 {
        self.inner.vocals.buffer.sample_rate()
    }

    /// Samples per channel.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> u32 {
        self.inner.vocals.buffer.len() as u32
    }

    /// Copy of one vocal channel, ready for `AudioBuffer.copyToChannel`.
    pub fn vocals_channel(&self, channel: u32) -> Result<Vec<f32>, JsError> {
        channel_of(&self.inner.vocals.buffer, channel)
    }

    pub fn instrumental_channel(&self, channel: u32) -> Result<Vec<f32>, JsError> {
        channel_of(&self.inner.instrumental.buffer, channel)
    }

    /// Move the vocal WAV bytes out (a second call returns an empty array).
    ///
    /// wasm-bindgen converts the `Vec<u8>` to a JS `Uint8Array`
    /// without an extra copy because ownership is moved.
    pub fn take_vocals_wav(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.inner.vocals.wav)
    }

    pub fn take_instrumental_wav(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.inner.instrumental.wav)
    }
}

fn channel_of(buffer: &SampleBuffer, channel: u32) -> Result<Vec<f32>, JsError> {
    let index = channel as usize;
    if index >= buffer.num_channels() {
        return Err(JsError::new(&format!(
            "channel {} out of range ({} channel(s))",
            channel,
            buffer.num_channels()
        )));
    }
    Ok(buffer.channel(index).to_vec())
}

/// Forwards progress to an optional JS callback `(percent, status) => boolean?`.
///
/// Returning `false` from the callback cancels the run. A callback that
/// throws also cancels it, and the thrown value is kept for the caller.
struct JsListener {
    callback: Option<Function>,
    cancelled: bool,
    thrown: Option<JsValue>,
}

impl SeparationListener for JsListener {
    fn on_event(&mut self, event: SeparationEvent) {
        let Some(callback) = &self.callback else {
            return;
        };
        let result = callback.call2(
            &JsValue::NULL,
            &JsValue::from_f64(event.progress() as f64),
            &JsValue::from_str(&event.status()),
        );
        match result {
            Ok(value) if value.as_bool() == Some(false) => self.cancelled = true,
            Ok(_) => {}
            Err(thrown) => {
                self.cancelled = true;
                self.thrown.get_or_insert(thrown);
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Split decoded audio into vocals and instrumental.
///
/// Accepts channel data from `AudioBuffer.getChannelData`; pass `undefined`
/// for `right` on mono input. `options` is an optional partial
/// `SeparatorConfig` object, e.g. `{ frame_size: 2048, domain: "spectral" }`.
#[wasm_bindgen]
pub fn separate(
    left: Vec<f32>,
    right: Option<Vec<f32>>,
    sample_rate: u32,
    options: JsValue,
    on_progress: Option<Function>,
) -> Result<SeparationResult, JsError> {
    let config: SeparatorConfig = if options.is_undefined() || options.is_null() {
        SeparatorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };

    let input = match right {
        Some(right) => SampleBuffer::stereo(left, right, sample_rate)?,
        None => SampleBuffer::mono(left, sample_rate)?,
    };

    let mut listener = JsListener {
        callback: on_progress,
        cancelled: false,
        thrown: None,
    };
    let result = Separator::new(config)?.separate_with_listener(&input, &mut listener);
    // A throw after the last cancellation check must not be lost either.
    if let Some(thrown) = listener.thrown {
        return Err(JsError::new(&format!(
            "progress callback threw: {}",
            describe_thrown(&thrown)
        )));
    }
    Ok(SeparationResult { inner: result? })
}

fn describe_thrown(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Returns the default separator settings as a JS object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(&SeparatorConfig::default())?)
}

// ─── Display helpers ────────────────────────────────────────────────────────

/// Min/max peaks for drawing a waveform, flattened to `[min0, max0, ...]`.
#[wasm_bindgen]
pub fn waveform_peaks(samples: &[f32], num_buckets: u32) -> Vec<f32> {
    WaveformPeaks::from_channel(samples, num_buckets as usize).to_interleaved()
}

/// Download name for a track: `"vocals"` + `"song.mp3"` gives `"vocals_song.wav"`.
#[wasm_bindgen]
pub fn download_filename(track: &str, original_name: &str) -> Result<String, JsError> {
    match StemKind::parse(track) {
        Some(kind) => Ok(kind.file_name(original_name)),
        None => Err(JsError::new(&format!(
            "Unknown track '{}'. Choices: vocals, instrumental",
            track
        ))),
    }
}
