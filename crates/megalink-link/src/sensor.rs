use std::fmt;
use std::str::FromStr;

use crate::error::LinkError;

/// Sensor classes the firmware answers read requests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Light,
    Ultrasonic,
    LineFollower,
    Sound,
    PirMotion,
    Potentiometer,
    LimitSwitch,
    Temperature,
    Touch,
    Humiture,
    Joystick,
    Gas,
    Flame,
    Compass,
    Angular,
    Button,
    Gyro,
    Pressure,
}

impl Sensor {
    /// Every sensor, in catalog order.
    pub const ALL: [Sensor; 18] = [
        Sensor::Light,
        Sensor::Ultrasonic,
        Sensor::LineFollower,
        Sensor::Sound,
        Sensor::PirMotion,
        Sensor::Potentiometer,
        Sensor::LimitSwitch,
        Sensor::Temperature,
        Sensor::Touch,
        Sensor::Humiture,
        Sensor::Joystick,
        Sensor::Gas,
        Sensor::Flame,
        Sensor::Compass,
        Sensor::Angular,
        Sensor::Button,
        Sensor::Gyro,
        Sensor::Pressure,
    ];

    /// Firmware device code. Several sensors share a code.
    pub fn device_id(self) -> u8 {
        match self {
            Sensor::Ultrasonic => 1,
            Sensor::Temperature => 2,
            Sensor::Light | Sensor::Potentiometer => 4,
            Sensor::Joystick => 5,
            Sensor::Gyro => 6,
            Sensor::Sound => 7,
            Sensor::PirMotion | Sensor::Touch => 15,
            Sensor::LineFollower => 17,
            Sensor::LimitSwitch => 21,
            Sensor::Button => 22,
            Sensor::Humiture => 23,
            Sensor::Flame => 24,
            Sensor::Gas => 25,
            Sensor::Compass => 26,
            Sensor::Angular => 28,
            Sensor::Pressure => 29,
        }
    }

    /// Name of the extra request byte this sensor takes, if any.
    pub fn extra_param(self) -> Option<&'static str> {
        match self {
            Sensor::Humiture => Some("type"),
            Sensor::Joystick | Sensor::Gyro => Some("axis"),
            _ => None,
        }
    }

    /// Catalog name, e.g. `line_follower`.
    pub fn name(self) -> &'static str {
        match self {
            Sensor::Light => "light",
            Sensor::Ultrasonic => "ultrasonic",
            Sensor::LineFollower => "line_follower",
            Sensor::Sound => "sound",
            Sensor::PirMotion => "pir_motion",
            Sensor::Potentiometer => "potentiometer",
            Sensor::LimitSwitch => "limit_switch",
            Sensor::Temperature => "temperature",
            Sensor::Touch => "touch",
            Sensor::Humiture => "humiture",
            Sensor::Joystick => "joystick",
            Sensor::Gas => "gas",
            Sensor::Flame => "flame",
            Sensor::Compass => "compass",
            Sensor::Angular => "angular",
            Sensor::Button => "button",
            Sensor::Gyro => "gyro",
            Sensor::Pressure => "pressure",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sensor {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Sensor::ALL
            .into_iter()
            .find(|sensor| sensor.name() == wanted)
            .ok_or_else(|| LinkError::UnknownMessage(s.to_string()))
    }
}
