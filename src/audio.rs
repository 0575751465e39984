//! Audio feedback
//!
//! Choosing what to play is plain logic driven by [`GameEvent`]s; playing
//! it uses the Web Audio API with procedurally generated sounds (no asset
//! files), so the player only exists in the browser build.

use rand::Rng;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bubble pops - short bright plop
    Pop1,
    /// Bubble pops - lower, rounder plop
    Pop2,
    /// Tap that didn't pop
    TapLight,
    /// Rising three-note jingle
    Encouragement1,
    /// Major arpeggio
    Encouragement2,
    /// Two-note sparkle
    Encouragement3,
}

/// A sound plus its loudness relative to the master volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    pub gain: f32,
}

/// Chance that a pop is followed by an encouragement jingle
pub const ENCOURAGEMENT_CHANCE: f64 = 0.3;
/// Relative loudness of a partial tap
pub const TAP_GAIN: f32 = 0.5;
/// Relative loudness of an encouragement jingle
pub const ENCOURAGEMENT_GAIN: f32 = 0.8;
/// Relative loudness of the background pad
pub const BGM_GAIN: f32 = 0.3;

const POPS: [SoundEffect; 2] = [SoundEffect::Pop1, SoundEffect::Pop2];
const ENCOURAGEMENTS: [SoundEffect; 3] = [
    SoundEffect::Encouragement1,
    SoundEffect::Encouragement2,
    SoundEffect::Encouragement3,
];

/// Pick the sounds for one event
pub fn cues_for_event<R: Rng + ?Sized>(
    rng: &mut R,
    event: &GameEvent,
    sound_feedback: bool,
) -> Vec<Cue> {
    match event {
        GameEvent::Popped { .. } => {
            let mut cues = vec![Cue {
                effect: POPS[rng.random_range(0..POPS.len())],
                gain: 1.0,
            }];
            if sound_feedback && rng.random_bool(ENCOURAGEMENT_CHANCE) {
                cues.push(Cue {
                    effect: ENCOURAGEMENTS[rng.random_range(0..ENCOURAGEMENTS.len())],
                    gain: ENCOURAGEMENT_GAIN,
                });
            }
            cues
        }
        GameEvent::PartialTap { .. } => vec![Cue {
            effect: SoundEffect::TapLight,
            gain: TAP_GAIN,
        }],
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{BGM_GAIN, Cue, SoundEffect, cues_for_event};
    use crate::Settings;
    use crate::sim::GameEvent;

    /// Looping pad: a few detuned oscillators through one gain node
    struct Pad {
        oscillators: Vec<OscillatorNode>,
        gain: GainNode,
    }

    /// Audio manager for the game
    ///
    /// The context is created on the first user gesture; browsers refuse
    /// to start audio before one.
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Set once creation was attempted, so a failure is reported once
        init_attempted: bool,
        volume: f32,
        sound_feedback: bool,
        bgm_enabled: bool,
        pad: Option<Pad>,
        rng: Pcg32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings, seed: u64) -> Self {
            Self {
                ctx: None,
                init_attempted: false,
                volume: settings.volume.clamp(0.0, 1.0),
                sound_feedback: settings.sound_feedback,
                bgm_enabled: settings.bgm,
                pad: None,
                rng: Pcg32::seed_from_u64(seed),
            }
        }

        /// Create (or wake) the audio context. Call from a user gesture.
        pub fn unlock(&mut self) {
            if self.ctx.is_none() && !self.init_attempted {
                self.init_attempted = true;
                match AudioContext::new() {
                    Ok(ctx) => {
                        log::info!("AudioContext created");
                        self.ctx = Some(ctx);
                    }
                    Err(e) => log::warn!("Failed to create AudioContext - audio disabled: {:?}", e),
                }
            }

            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }

            if self.bgm_enabled && self.pad.is_none() {
                self.start_pad();
            }
        }

        /// Pick up changed preferences
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.volume.clamp(0.0, 1.0);
            self.sound_feedback = settings.sound_feedback;
            if let Some(pad) = &self.pad {
                pad.gain.gain().set_value(self.volume * BGM_GAIN);
            }
            self.set_bgm(settings.bgm);
        }

        /// Start or stop the background pad
        pub fn set_bgm(&mut self, enabled: bool) {
            if self.bgm_enabled == enabled {
                return;
            }
            self.bgm_enabled = enabled;
            if enabled {
                if self.ctx.is_some() {
                    self.start_pad();
                } else {
                    log::debug!("BGM enabled, starts after the first tap");
                }
            } else {
                self.stop_pad();
            }
        }

        /// Play whatever an event calls for
        pub fn handle_event(&mut self, event: &GameEvent) {
            if self.ctx.is_none() {
                return;
            }
            for cue in cues_for_event(&mut self.rng, event, self.sound_feedback) {
                self.play(cue);
            }
        }

        fn play(&self, cue: Cue) {
            let vol = self.volume * cue.gain;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            match cue.effect {
                SoundEffect::Pop1 => self.play_pop(ctx, vol, 900.0, 0.08),
                SoundEffect::Pop2 => self.play_pop(ctx, vol, 650.0, 0.11),
                SoundEffect::TapLight => self.play_tap(ctx, vol),
                SoundEffect::Encouragement1 => {
                    self.play_notes(ctx, vol, &[523.0, 659.0, 784.0], 0.09, OscillatorType::Triangle)
                }
                SoundEffect::Encouragement2 => self.play_notes(
                    ctx,
                    vol,
                    &[440.0, 554.0, 659.0, 880.0],
                    0.07,
                    OscillatorType::Sine,
                ),
                SoundEffect::Encouragement3 => {
                    self.play_notes(ctx, vol, &[988.0, 1319.0], 0.12, OscillatorType::Sine)
                }
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pop - pitch drops fast under a sharp decay
        fn play_pop(&self, ctx: &AudioContext, vol: f32, freq: f32, length: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.frequency().set_value_at_time(freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(freq * 0.3, t + length)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + length + 0.02).ok();
        }

        /// Tap - soft tick
        fn play_tap(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.04)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.06).ok();
        }

        /// Short melody, one oscillator per note
        fn play_notes(
            &self,
            ctx: &AudioContext,
            vol: f32,
            notes: &[f32],
            spacing: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        fn start_pad(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            let Ok(gain) = ctx.create_gain() else {
                log::warn!("Failed to create BGM gain node");
                return;
            };
            gain.gain().set_value(self.volume * BGM_GAIN);
            if gain.connect_with_audio_node(&ctx.destination()).is_err() {
                log::warn!("Failed to connect BGM output");
                return;
            }

            // Soft A-minor drone, slightly detuned for movement
            let oscillators: Vec<OscillatorNode> = [110.0, 110.7, 164.8, 220.0]
                .iter()
                .filter_map(|&freq| {
                    let osc = ctx.create_oscillator().ok()?;
                    osc.set_type(OscillatorType::Sine);
                    osc.frequency().set_value(freq);
                    osc.connect_with_audio_node(&gain).ok()?;
                    osc.start().ok()?;
                    Some(osc)
                })
                .collect();

            log::info!("BGM started");
            self.pad = Some(Pad { oscillators, gain });
        }

        fn stop_pad(&mut self) {
            if let Some(pad) = self.pad.take() {
                for osc in &pad.oscillators {
                    let _ = osc.stop();
                }
                let _ = pad.gain.disconnect();
                log::info!("BGM stopped");
            }
        }
    }
}
