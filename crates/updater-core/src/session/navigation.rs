/// Screens the view layer can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Main,
}

/// Receives navigation signals from the session state machine.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator for contexts with no view attached (tests, headless use).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}
