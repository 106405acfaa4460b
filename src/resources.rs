/// Startup-time hardware resource ledger.
///
/// Board wiring is declared in `board`; this ledger checks that no two
/// components were configured onto the same GPIO, SPI host or PWM channel
/// before any driver touches the hardware.
use core::fmt;

use heapless::Vec;

use crate::board::SpiHost;
use crate::error::Error;

/// ESP32 GPIOs 34-39 have no output driver.
const INPUT_ONLY_GPIO: core::ops::RangeInclusive<u8> = 34..=39;

/// Enough for two SPI buses, a panel, a backlight and a touch controller.
pub const MAX_CLAIMS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Gpio(u8),
    SpiHost(SpiHost),
    PwmChannel(u8),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Gpio(pin) => write!(f, "GPIO{}", pin),
            Resource::SpiHost(host) => write!(f, "{}", host),
            Resource::PwmChannel(ch) => write!(f, "PWM channel {}", ch),
        }
    }
}

/// Component a resource is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    DisplayBus,
    Panel,
    Backlight,
    Touch,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Owner::DisplayBus => "display bus",
            Owner::Panel => "panel",
            Owner::Backlight => "backlight",
            Owner::Touch => "touch",
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Claim {
    resource: Resource,
    owner: Owner,
    shared: bool,
}

/// Record of claimed resources, in claim order.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    claims: Vec<Claim, MAX_CLAIMS>,
}

impl ResourceLedger {
    pub const fn new() -> Self {
        Self { claims: Vec::new() }
    }

    /// Claim a resource exclusively.
    pub fn claim(&mut self, resource: Resource, owner: Owner) -> Result<(), Error> {
        self.insert(resource, owner, false)
    }

    /// Claim a bus-level resource. Two claims that both set `shared`
    /// coexist (several devices on one SPI host).
    pub fn claim_bus(&mut self, resource: Resource, owner: Owner, shared: bool) -> Result<(), Error> {
        self.insert(resource, owner, shared)
    }

    /// Claim a GPIO that will be driven as an output.
    pub fn claim_output(&mut self, pin: u8, owner: Owner, shared: bool) -> Result<(), Error> {
        if INPUT_ONLY_GPIO.contains(&pin) {
            return Err(Error::InputOnlyPin { pin, owner });
        }
        self.insert(Resource::Gpio(pin), owner, shared)
    }

    /// Current owner of a resource (first claimant for shared ones).
    pub fn owner(&self, resource: Resource) -> Option<Owner> {
        self.claims
            .iter()
            .find(|c| c.resource == resource)
            .map(|c| c.owner)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    fn insert(&mut self, resource: Resource, owner: Owner, shared: bool) -> Result<(), Error> {
        if let Some(existing) = self.claims.iter().find(|c| c.resource == resource) {
            if existing.shared && shared {
                log::debug!("{} shared by {} and {}", resource, existing.owner, owner);
                return Ok(());
            }
            return Err(Error::ResourceConflict {
                resource,
                first: existing.owner,
                second: owner,
            });
        }
        self.claims
            .push(Claim {
                resource,
                owner,
                shared,
            })
            .map_err(|_| Error::TooManyClaims { capacity: MAX_CLAIMS })
    }
}
