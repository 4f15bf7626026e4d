use indexmap::IndexMap;
use miette::Diagnostic;
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const DEFAULT_PRIORITY: i32 = 0;

#[derive(Debug, Error, Diagnostic)]
pub enum HookError {
    #[error("unknown hook event: {name}")]
    #[diagnostic(
        code(webroot_sync::hooks::unknown_event),
        help("Valid events are: ['post-install-cmd', 'post-update-cmd']")
    )]
    UnknownEvent { name: String },
}

/// Lifecycle events of the host build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    PostInstallCmd,
    PostUpdateCmd,
}
impl HookEvent {
    pub const ALL: [HookEvent; 2] = [Self::PostInstallCmd, Self::PostUpdateCmd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostInstallCmd => "post-install-cmd",
            Self::PostUpdateCmd => "post-update-cmd",
        }
    }
}
impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for HookEvent {
    type Err = HookError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == name)
            .ok_or_else(|| HookError::UnknownEvent {
                name: name.to_string(),
            })
    }
}

/// Entry points a hook can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    InitialiseWebroot,
}
impl Listener {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialiseWebroot => "initialise-webroot",
        }
    }
}
impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub listener: Listener,
    pub priority: i32,
}

/// Event table handed to the host: both install and update run the webroot
/// initialisation at the neutral priority.
pub fn subscribed_events() -> IndexMap<HookEvent, Vec<Subscription>> {
    HookEvent::ALL
        .into_iter()
        .map(|event| {
            (
                event,
                vec![Subscription {
                    listener: Listener::InitialiseWebroot,
                    priority: DEFAULT_PRIORITY,
                }],
            )
        })
        .collect()
}

/// Listeners for `event`, highest priority first. Equal priorities keep
/// registration order.
pub fn listeners_for(event: HookEvent) -> Vec<Subscription> {
    let mut listeners = subscribed_events()
        .shift_remove(&event)
        .unwrap_or_default();

    listeners.sort_by(|a, b| b.priority.cmp(&a.priority));

    listeners
}
