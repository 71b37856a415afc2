use std::io::Write;

use timer_core::{Alert, AlertSink};

use crate::tone::{BeepDevice, ToneGenerator};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlertConfig {
    pub audio: bool,
    pub flash: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            audio: true,
            flash: true,
        }
    }
}

enum BeepOutput {
    Tone(Box<dyn BeepDevice>),
    Bell,
}

/// Alert sink for the countdown: a tone on the audio device when there is
/// one, the terminal bell otherwise. The output is opened on the first beep,
/// and a tone that stops working is swapped for the bell for good.
pub struct Beeper {
    config: AlertConfig,
    output: Option<BeepOutput>,
}

impl Beeper {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            output: None,
        }
    }

    pub fn config(&self) -> AlertConfig {
        self.config
    }

    pub fn set_config(&mut self, config: AlertConfig) {
        if config != self.config {
            log::info!("alert settings: audio={} flash={}", config.audio, config.flash);
        }
        self.config = config;
    }

    fn output(&mut self) -> &BeepOutput {
        self.output.get_or_insert_with(|| match ToneGenerator::new() {
            Ok(tone) => BeepOutput::Tone(Box::new(tone)),
            Err(e) => {
                log::warn!("no tone output ({:#}), falling back to the terminal bell", e);
                BeepOutput::Bell
            }
        })
    }

    fn beep(&mut self, alert: Alert) {
        let failed = match self.output() {
            BeepOutput::Tone(tone) => tone.beep(alert).err(),
            BeepOutput::Bell => {
                ring_bell();
                None
            }
        };
        if let Some(e) = failed {
            log::warn!("tone output failed ({:#}), switching to the terminal bell", e);
            self.output = Some(BeepOutput::Bell);
            ring_bell();
        }
    }

    #[cfg(test)]
    fn on_bell(&self) -> bool {
        matches!(self.output, Some(BeepOutput::Bell))
    }
}

impl AlertSink for Beeper {
    fn emit(&mut self, alert: Alert) {
        if !self.config.audio {
            return;
        }
        log::debug!("beep for {:?}", alert);
        self.beep(alert);
    }
}

/// Best effort; a terminal that can't take the bell is ignored.
fn ring_bell() {
    let mut out = std::io::stdout();
    if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
        log::debug!("terminal bell failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_beeper_never_opens_output() {
        let mut beeper = Beeper::new(AlertConfig {
            audio: false,
            flash: true,
        });
        beeper.emit(Alert::Tick(3));
        beeper.emit(Alert::Final);
        assert!(beeper.output.is_none());
    }

    struct BrokenTone;

    impl BeepDevice for BrokenTone {
        fn beep(&self, _alert: Alert) -> anyhow::Result<()> {
            anyhow::bail!("device unplugged")
        }
    }

    struct QueueTone(crate::tone::ToneQueue);

    impl BeepDevice for QueueTone {
        fn beep(&self, alert: Alert) -> anyhow::Result<()> {
            self.0.push(alert)
        }
    }

    #[test]
    fn test_failing_tone_switches_to_bell() {
        let mut beeper = Beeper::new(AlertConfig::default());
        beeper.output = Some(BeepOutput::Tone(Box::new(BrokenTone)));
        assert!(!beeper.on_bell());

        beeper.emit(Alert::Tick(5));
        assert!(beeper.on_bell());

        beeper.emit(Alert::Final);
        assert!(beeper.on_bell());
    }

    #[test]
    fn test_stream_error_switches_to_bell() {
        let queue = crate::tone::ToneQueue::new();
        let mut beeper = Beeper::new(AlertConfig::default());
        beeper.output = Some(BeepOutput::Tone(Box::new(QueueTone(queue.clone()))));

        beeper.emit(Alert::Tick(3));
        assert!(!beeper.on_bell());
        assert_eq!(queue.pending(), 1);

        queue.mark_failed();
        beeper.emit(Alert::Tick(2));
        assert!(beeper.on_bell());
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_set_config() {
        let mut beeper = Beeper::new(AlertConfig::default());
        assert!(beeper.config().audio);
        beeper.set_config(AlertConfig {
            audio: false,
            flash: false,
        });
        assert_eq!(
            beeper.config(),
            AlertConfig {
                audio: false,
                flash: false
            }
        );
    }
}
