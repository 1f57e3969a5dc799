use crate::LcdResult;
use std::fmt::Debug;

/// Lifecycle hooks a host application uses to manage a peripheral.
///
/// The host calls [Device::initialize] once before using the device in any other way, and may call
/// [Device::shutdown] when it's done with it.
pub trait Device: Debug {
    /// Gets the name identifying this device.
    fn name(&self) -> &str;

    /// Renames the device.
    fn set_name(&mut self, name: &str);

    /// Brings the device up. Has to succeed before the device can be used.
    fn initialize(&mut self) -> LcdResult<()>;

    /// Stops using the device.
    fn shutdown(&mut self) -> LcdResult<()>;
}
