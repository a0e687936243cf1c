use crate::block::bio_core::Elevator;
use crate::block::block_error::BlockError;
use crate::block::config::ElevatorConfig;
use crate::block::schedulers::clook_scheduler::ClookScheduler;
use crate::block::schedulers::noop_scheduler::NoopScheduler;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Constructor for a boxed elevator writing to a console of type `C`.
pub type ElevatorInit<C> = fn(&ElevatorConfig, C) -> Result<Box<dyn Elevator<C>>, BlockError>;

/// A registered elevator type.
pub struct ElevatorType<C> {
    pub name: &'static str,
    pub init: ElevatorInit<C>,
}

impl<C> Clone for ElevatorType<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ElevatorType<C> {}

impl<C: 'static> ElevatorType<C> {
    /// The elevator type for `E`, registered under `name`.
    pub fn of<E: Elevator<C> + 'static>(name: &'static str) -> Self {
        Self {
            name,
            init: init_boxed::<E, C>,
        }
    }
}

fn init_boxed<E: Elevator<C> + 'static, C>(
    config: &ElevatorConfig,
    console: C,
) -> Result<Box<dyn Elevator<C>>, BlockError> {
    Ok(Box::new(E::init(config, console)?))
}

/// The elevator types a block layer can choose from.
///
/// Each block layer owns its registry; there is no process-wide list.
pub struct ElevatorRegistry<C> {
    types: Vec<ElevatorType<C>>,
}

impl<C> Default for ElevatorRegistry<C> {
    fn default() -> Self {
        Self { types: Vec::new() }
    }
}

impl<C: fmt::Write + 'static> ElevatorRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `noop` and `clook` elevators.
    pub fn with_builtin() -> Self {
        Self {
            types: alloc::vec![
                ElevatorType::of::<NoopScheduler<C>>(NoopScheduler::<C>::NAME),
                ElevatorType::of::<ClookScheduler<C>>(ClookScheduler::<C>::NAME),
            ],
        }
    }

    pub fn register(&mut self, ty: ElevatorType<C>) -> Result<(), BlockError> {
        if self.find(ty.name).is_some() {
            return Err(BlockError::DuplicateElevator(ty.name));
        }
        self.types.push(ty);
        Ok(())
    }

    /// Returns whether an elevator named `name` was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.types.len();
        self.types.retain(|ty| ty.name != name);
        self.types.len() != before
    }

    pub fn find(&self, name: &str) -> Option<&ElevatorType<C>> {
        self.types.iter().find(|ty| ty.name == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().map(|ty| ty.name)
    }

    /// Set up the elevator `config.elevator` for a device.
    pub fn init(
        &self,
        config: &ElevatorConfig,
        console: C,
    ) -> Result<Box<dyn Elevator<C>>, BlockError> {
        let ty = self
            .find(&config.elevator)
            .ok_or_else(|| BlockError::UnknownElevator(config.elevator.clone()))?;

        (ty.init)(config, console)
    }

    /// All registered names with `active` in brackets, e.g. `noop [clook]`.
    pub fn describe(&self, active: &str) -> String {
        let mut out = String::new();
        for (i, name) in self.names().enumerate() {
            if i != 0 {
                out.push(' ');
            }
            if name == active {
                out.push('[');
                out.push_str(name);
                out.push(']');
            } else {
                out.push_str(name);
            }
        }
        out
    }
}

impl<C> fmt::Display for ElevatorRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Elevators:")?;
        for ty in self.types.iter() {
            writeln!(f, "    {}", ty.name)?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for ElevatorRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.types.iter().map(|ty| ty.name.to_string()))
            .finish()
    }
}
