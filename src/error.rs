/// Errors reported by the display stack.
///
/// Drawing and touch failures carry no payload: the wrapped driver error
/// types are generic over the bus, so they are folded into a variant that
/// names the layer that failed.
use core::fmt;

use crate::resources::{Owner, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// SPI or D/C pin failure while talking to the panel
    Bus,
    /// Panel reset/init sequence failed
    PanelInit,
    /// Drawing before `init()`
    NotInitialized,
    /// Backlight PWM could not be updated
    Backlight,
    /// Touch controller bus or IRQ pin failure
    Touch,
    /// A `Display` impl returned an error while printing
    Format,
    /// Two components were configured onto the same hardware resource
    ResourceConflict {
        resource: Resource,
        first: Owner,
        second: Owner,
    },
    /// More claims than the resource ledger can hold
    TooManyClaims { capacity: usize },
    /// An output function was assigned to an input-only GPIO
    InputOnlyPin { pin: u8, owner: Owner },
    /// Bus clock above what the controller accepts
    FrequencyTooHigh { hz: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus => f.write_str("panel bus error"),
            Error::PanelInit => f.write_str("panel initialization failed"),
            Error::NotInitialized => f.write_str("panel not initialized"),
            Error::Backlight => f.write_str("backlight update failed"),
            Error::Touch => f.write_str("touch controller error"),
            Error::Format => f.write_str("formatting error"),
            Error::ResourceConflict {
                resource,
                first,
                second,
            } => write!(f, "{} claimed by both {} and {}", resource, first, second),
            Error::TooManyClaims { capacity } => {
                write!(f, "resource ledger full ({} claims)", capacity)
            }
            Error::InputOnlyPin { pin, owner } => {
                write!(f, "GPIO{} is input-only but {} drives it", pin, owner)
            }
            Error::FrequencyTooHigh { hz } => {
                write!(f, "SPI clock {} Hz exceeds the controller maximum", hz)
            }
        }
    }
}
