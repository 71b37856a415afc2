/// An audible signal requested by the countdown.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Alert {
    /// One beep per whole second in the final ten, carrying that second.
    Tick(u64),
    /// The countdown reached zero. Emitted three times in a row.
    Final,
}

/// Consumer of alert signals. Emitting never fails: a sink that cannot play
/// a sound falls back or drops the signal itself.
pub trait AlertSink {
    fn emit(&mut self, alert: Alert);
}

/// Records every alert, in order.
impl AlertSink for Vec<Alert> {
    fn emit(&mut self, alert: Alert) {
        self.push(alert);
    }
}

/// Silent sink.
impl AlertSink for () {
    fn emit(&mut self, _alert: Alert) {}
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn emit(&mut self, alert: Alert) {
        (**self).emit(alert);
    }
}
