pub mod console;
pub mod indicator;
pub mod radio;
pub mod sensors;

pub use indicator::{Indicator, LogIndicator};
pub use radio::{Radio, UdpRadio};
