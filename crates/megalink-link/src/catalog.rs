//! Static registry of every message the host can build by name.
//!
//! Front ends (the CLI, configuration loaders) describe a message as a name
//! plus loosely typed [`Params`]; [`build`] validates them and produces the
//! typed [`Message`].

use crate::error::{LinkError, Result};
use crate::message::{Message, MessageKind};
use crate::sensor::Sensor;

/// Loosely typed message arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pub port: Option<u8>,
    pub slot: Option<u8>,
    /// Positional numeric arguments, in the order listed by [`CatalogEntry::usage`].
    pub values: Vec<f64>,
    pub text: Option<String>,
}

impl Params {
    /// Params with only a port set.
    pub fn port(port: u8) -> Self {
        Self {
            port: Some(port),
            ..Self::default()
        }
    }

    fn require_port(&self) -> Result<u8> {
        self.port
            .ok_or_else(|| LinkError::InvalidParameter("port is required".to_string()))
    }

    fn require_slot(&self) -> Result<u8> {
        self.slot
            .ok_or_else(|| LinkError::InvalidParameter("slot is required".to_string()))
    }

    fn value(&self, index: usize, name: &str) -> Result<f64> {
        self.values.get(index).copied().ok_or_else(|| {
            LinkError::InvalidParameter(format!("{name} (value #{}) is required", index + 1))
        })
    }

    fn int<T: TryFrom<i64>>(&self, index: usize, name: &str) -> Result<T> {
        let value = self.value(index, name)?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(LinkError::InvalidParameter(format!(
                "{name} must be an integer, got {value}"
            )));
        }
        T::try_from(value as i64).map_err(|_| {
            LinkError::InvalidParameter(format!("{name} out of range: {value}"))
        })
    }

    fn flag(&self, index: usize, name: &str) -> Result<bool> {
        Ok(self.value(index, name)? != 0.0)
    }

    fn bytes_from(&self, start: usize, name: &str) -> Result<Vec<u8>> {
        (start..self.values.len().max(start))
            .map(|index| self.int::<u8>(index, name))
            .collect()
    }

    fn require_text(&self) -> Result<String> {
        self.text
            .clone()
            .ok_or_else(|| LinkError::InvalidParameter("text is required".to_string()))
    }
}

#[derive(Clone, Copy)]
enum Builder {
    Read(Sensor),
    Command(fn(&Params) -> Result<Message>),
}

/// One named message.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub summary: &'static str,
    /// Parameters the entry reads, as CLI-style hints.
    pub usage: &'static str,
    pub kind: MessageKind,
    builder: Builder,
}

impl CatalogEntry {
    /// Build the message from `params`.
    pub fn build(&self, params: &Params) -> Result<Message> {
        match self.builder {
            Builder::Read(sensor) => read(sensor, params),
            Builder::Command(build) => build(params),
        }
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

const fn sensor(name: &'static str, summary: &'static str, usage: &'static str, sensor: Sensor) -> CatalogEntry {
    CatalogEntry {
        name,
        summary,
        usage,
        kind: MessageKind::ReadRequest,
        builder: Builder::Read(sensor),
    }
}

const fn command(
    name: &'static str,
    summary: &'static str,
    usage: &'static str,
    build: fn(&Params) -> Result<Message>,
) -> CatalogEntry {
    CatalogEntry {
        name,
        summary,
        usage,
        kind: MessageKind::FireAndForget,
        builder: Builder::Command(build),
    }
}

/// Every message, sensors first.
pub static CATALOG: &[CatalogEntry] = &[
    sensor("light", "Ambient light level", "--port", Sensor::Light),
    sensor("ultrasonic", "Ultrasonic distance (cm)", "--port", Sensor::Ultrasonic),
    sensor("line_follower", "Line follower state", "--port", Sensor::LineFollower),
    sensor("sound", "Sound level", "--port", Sensor::Sound),
    sensor("pir_motion", "PIR motion detected", "--port", Sensor::PirMotion),
    sensor("potentiometer", "Potentiometer position", "--port", Sensor::Potentiometer),
    sensor("limit_switch", "Limit switch state", "--port", Sensor::LimitSwitch),
    sensor("temperature", "Temperature probe", "--port", Sensor::Temperature),
    sensor("touch", "Touch sensor state", "--port", Sensor::Touch),
    sensor("humiture", "Humidity or temperature", "--port --value TYPE", Sensor::Humiture),
    sensor("joystick", "Joystick axis", "--port --value AXIS", Sensor::Joystick),
    sensor("gas", "Gas concentration", "--port", Sensor::Gas),
    sensor("flame", "Flame detected", "--port", Sensor::Flame),
    sensor("compass", "Compass heading", "--port", Sensor::Compass),
    sensor("angular", "Angular sensor", "--port", Sensor::Angular),
    sensor("button", "Button state", "--port", Sensor::Button),
    sensor("gyro", "Gyro axis", "--port --value AXIS", Sensor::Gyro),
    sensor("pressure", "Barometric pressure", "--port", Sensor::Pressure),
    command("pressure_begin", "Start the pressure sensor", "", |_| {
        Ok(Message::PressureBegin)
    }),
    command("motor_run", "Run a DC motor", "--port --value SPEED", |p| {
        Ok(Message::MotorRun {
            port: p.require_port()?,
            speed: p.int(0, "speed")?,
        })
    }),
    command("motor_move", "Drive the left/right motor pair", "--value LEFT --value RIGHT", |p| {
        Ok(Message::MotorMove {
            left: p.int(0, "left")?,
            right: p.int(1, "right")?,
        })
    }),
    command("servo_run", "Move a servo", "--port --slot --value ANGLE", |p| {
        Ok(Message::ServoRun {
            port: p.require_port()?,
            slot: p.require_slot()?,
            angle: p.int(0, "angle")?,
        })
    }),
    command("encoder_run", "Run an encoder motor", "--slot --value SPEED", |p| {
        Ok(Message::EncoderRun {
            slot: p.require_slot()?,
            speed: p.int(0, "speed")?,
        })
    }),
    command(
        "encoder_move",
        "Move an encoder motor by a distance",
        "--slot --value SPEED --value DISTANCE",
        |p| {
            Ok(Message::EncoderMove {
                slot: p.require_slot()?,
                speed: p.int(0, "speed")?,
                distance: p.int(1, "distance")?,
            })
        },
    ),
    command(
        "encoder_move_to",
        "Move an encoder motor to a position",
        "--slot --value SPEED --value POSITION",
        |p| {
            Ok(Message::EncoderMoveTo {
                slot: p.require_slot()?,
                speed: p.int(0, "speed")?,
                position: p.int(1, "position")?,
            })
        },
    ),
    command("encoder_zero", "Zero an encoder position", "--slot", |p| {
        Ok(Message::EncoderZero {
            slot: p.require_slot()?,
        })
    }),
    CatalogEntry {
        kind: MessageKind::ReadRequest,
        ..command("encoder_position", "Read an encoder position", "--slot", |p| {
            Ok(Message::EncoderPosition {
                slot: p.require_slot()?,
            })
        })
    },
    command("stepper_run", "Run a stepper motor", "--slot --value SPEED", |p| {
        Ok(Message::StepperRun {
            slot: p.require_slot()?,
            speed: p.int(0, "speed")?,
        })
    }),
    command(
        "stepper_move",
        "Move a stepper motor by a distance",
        "--port --value SPEED --value DISTANCE",
        |p| {
            Ok(Message::StepperMove {
                port: p.require_port()?,
                speed: p.int(0, "speed")?,
                distance: p.int(1, "distance")?,
            })
        },
    ),
    command(
        "stepper_move_to",
        "Move a stepper motor to a position",
        "--port --value SPEED --value POSITION",
        |p| {
            Ok(Message::StepperMoveTo {
                port: p.require_port()?,
                speed: p.int(0, "speed")?,
                position: p.int(1, "position")?,
            })
        },
    ),
    command("stepper_zero", "Zero a stepper position", "--port", |p| {
        Ok(Message::StepperZero {
            port: p.require_port()?,
        })
    }),
    command(
        "rgb_led",
        "Set one LED of an RGB strip (index 0 sets all)",
        "--port --slot --value INDEX --value R --value G --value B",
        |p| {
            Ok(Message::RgbLed {
                port: p.require_port()?,
                slot: p.require_slot()?,
                index: p.int(0, "index")?,
                red: p.int(1, "red")?,
                green: p.int(2, "green")?,
                blue: p.int(3, "blue")?,
            })
        },
    ),
    command("rgb_led_show", "Latch pending RGB LED colors", "--port --slot", |p| {
        Ok(Message::RgbLedShow {
            port: p.require_port()?,
            slot: p.require_slot()?,
        })
    }),
    command("seven_segment", "Show a number on a 7-segment display", "--port --value NUMBER", |p| {
        Ok(Message::SevenSegment {
            port: p.require_port()?,
            number: p.value(0, "number")? as f32,
        })
    }),
    command(
        "matrix_text",
        "Show text on an LED matrix",
        "--port --value X --value Y --text TEXT",
        |p| {
            Ok(Message::MatrixText {
                port: p.require_port()?,
                x: p.int(0, "x")?,
                y: p.int(1, "y")?,
                text: p.require_text()?,
            })
        },
    ),
    command(
        "matrix_bitmap",
        "Draw column bitmaps on an LED matrix",
        "--port --value X --value Y --value COLUMN...",
        |p| {
            Ok(Message::MatrixBitmap {
                port: p.require_port()?,
                x: p.int(0, "x")?,
                y: p.int(1, "y")?,
                columns: p.bytes_from(2, "column")?,
            })
        },
    ),
    command("shutter", "Press or release a camera shutter", "--port --value ON", |p| {
        Ok(Message::Shutter {
            port: p.require_port()?,
            on: p.flag(0, "on")?,
        })
    }),
    command("focus", "Press or release camera focus", "--port --value ON", |p| {
        Ok(Message::Focus {
            port: p.require_port()?,
            on: p.flag(0, "on")?,
        })
    }),
];

/// Find an entry by name. Dashes and case are ignored.
pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
    let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
    CATALOG.iter().find(|entry| entry.name == wanted)
}

/// Build the named message from `params`.
pub fn build(name: &str, params: &Params) -> Result<Message> {
    lookup(name)
        .ok_or_else(|| LinkError::UnknownMessage(name.to_string()))?
        .build(params)
}

fn read(sensor: Sensor, params: &Params) -> Result<Message> {
    let port = params.require_port()?;
    match sensor.extra_param() {
        Some(extra) => Ok(Message::read_with(sensor, port, params.int(0, extra)?)),
        None => Ok(Message::read(sensor, port)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique_and_match_messages() {
        let mut names: Vec<_> = CATALOG.iter().map(|entry| entry.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 38);
    }

    #[test]
    fn every_sensor_has_an_entry() {
        for sensor in Sensor::ALL {
            let entry = lookup(sensor.name()).unwrap();
            assert_eq!(entry.kind, MessageKind::ReadRequest);
        }
    }

    #[test]
    fn build_sensor_read() {
        let message = build("ultrasonic", &Params::port(10)).unwrap();
        assert_eq!(message, Message::read(Sensor::Ultrasonic, 10));
        assert_eq!(message.ext_id(), 161);
    }

    #[test]
    fn build_sensor_with_extra() {
        let params = Params {
            port: Some(2),
            values: vec![1.0],
            ..Params::default()
        };
        assert_eq!(
            build("joystick", &params).unwrap(),
            Message::read_with(Sensor::Joystick, 2, 1)
        );
        assert!(matches!(
            build("joystick", &Params::port(2)),
            Err(LinkError::InvalidParameter(_))
        ));
    }

    #[test]
    fn built_kind_matches_entry_kind() {
        let params = Params {
            port: Some(1),
            slot: Some(1),
            values: vec![1.0, 1.0, 1.0, 1.0],
            text: Some("ok".to_string()),
        };
        for entry in CATALOG {
            let message = entry.build(&params).unwrap();
            assert_eq!(message.kind(), entry.kind, "{}", entry.name);
            assert_eq!(message.name(), entry.name);
        }
    }

    #[test]
    fn build_commands() {
        let params = Params {
            port: Some(1),
            values: vec![-100.0],
            ..Params::default()
        };
        assert_eq!(
            build("motor-run", &params).unwrap(),
            Message::MotorRun {
                port: 1,
                speed: -100
            }
        );

        let params = Params {
            port: Some(3),
            values: vec![0.0, 1.0, 0x81 as f64, 0x42 as f64],
            ..Params::default()
        };
        assert_eq!(
            build("matrix_bitmap", &params).unwrap(),
            Message::MatrixBitmap {
                port: 3,
                x: 0,
                y: 1,
                columns: vec![0x81, 0x42]
            }
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let missing_port = Params {
            values: vec![1.0],
            ..Params::default()
        };
        assert!(matches!(
            build("motor_run", &missing_port),
            Err(LinkError::InvalidParameter(_))
        ));

        let out_of_range = Params {
            port: Some(1),
            slot: Some(1),
            values: vec![300.0],
            ..Params::default()
        };
        assert!(matches!(
            build("servo_run", &out_of_range),
            Err(LinkError::InvalidParameter(_))
        ));

        let fractional = Params {
            port: Some(1),
            values: vec![1.5],
            ..Params::default()
        };
        assert!(matches!(
            build("motor_run", &fractional),
            Err(LinkError::InvalidParameter(_))
        ));
    }

    #[test]
    fn unknown_name_is_reported() {
        assert!(matches!(
            build("warp_drive", &Params::default()),
            Err(LinkError::UnknownMessage(name)) if name == "warp_drive"
        ));
    }
}
