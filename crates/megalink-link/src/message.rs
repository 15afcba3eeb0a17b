//! Requests and commands the host can send to the board.
//!
//! Every message knows its outbound body, its correlation key and whether
//! the firmware answers it. Bodies are framed by
//! [`megalink_frame::encode_frame`], which prefixes `FF 55 <len>`.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use megalink_frame::wire::{encode_f32, encode_i16, encode_i32};
use megalink_frame::{encode_frame, MAX_BODY};

use crate::error::Result;
use crate::sensor::Sensor;

/// Read a sensor value; the board replies.
pub const ACTION_READ: u8 = 0x01;
/// Drive an actuator.
pub const ACTION_RUN: u8 = 0x02;
/// Set a digital output (camera trigger lines).
pub const ACTION_SET: u8 = 0x03;

const DEVICE_MOTOR_PAIR: u8 = 0x05;
const DEVICE_SEVEN_SEGMENT: u8 = 0x09;
const DEVICE_MOTOR: u8 = 0x0A;
const DEVICE_SERVO: u8 = 0x0B;
const DEVICE_RGB_LED: u8 = 0x12;
const DEVICE_RGB_LED_SHOW: u8 = 0x13;
const DEVICE_SHUTTER: u8 = 0x14;
const DEVICE_PRESSURE: u8 = 0x1D;
const DEVICE_LED_MATRIX: u8 = 0x29;
/// Encoder motor board position channel.
pub const DEVICE_ENCODER_POSITION: u8 = 0x3D;
/// Encoder motor driver.
pub const DEVICE_ENCODER: u8 = 0x3E;
/// Stepper motor driver.
pub const DEVICE_STEPPER: u8 = 0x4C;

const MOTION_MOVE: u8 = 0x01;
const MOTION_RUN: u8 = 0x02;
const MOTION_ZERO: u8 = 0x04;
const MOTION_MOVE_TO: u8 = 0x06;

const MATRIX_TEXT: u8 = 0x01;
const MATRIX_BITMAP: u8 = 0x02;

/// Row origin of the LED matrix; the firmware counts rows from the bottom.
const MATRIX_TOP_ROW: i8 = 7;

/// Bytes of a matrix text body before the characters.
const MATRIX_TEXT_HEADER: usize = 8;

/// Whether the firmware answers a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Registered under its correlation key; completes when the reply arrives.
    ReadRequest,
    /// Written and forgotten.
    FireAndForget,
}

/// One request or command.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Read a sensor on `port`.
    SensorRead {
        sensor: Sensor,
        port: u8,
        /// Replaces the sensor's fixed device code when set.
        device_id: Option<u8>,
        /// Trailing parameter (humiture type, joystick/gyro axis).
        extra: Option<u8>,
    },
    /// Start the barometric pressure sensor.
    PressureBegin,
    MotorRun { port: u8, speed: i16 },
    /// Drive the left/right motor pair; the left motor is mounted mirrored.
    MotorMove { left: i16, right: i16 },
    ServoRun { port: u8, slot: u8, angle: u8 },
    EncoderRun { slot: u8, speed: i16 },
    EncoderMove { slot: u8, speed: i16, distance: i32 },
    EncoderMoveTo { slot: u8, speed: i16, position: i32 },
    EncoderZero { slot: u8 },
    /// Read the current encoder position; the board replies.
    EncoderPosition { slot: u8 },
    StepperRun { slot: u8, speed: i16 },
    StepperMove { port: u8, speed: i16, distance: i32 },
    StepperMoveTo { port: u8, speed: i16, position: i32 },
    StepperZero { port: u8 },
    RgbLed {
        port: u8,
        slot: u8,
        index: u8,
        red: u8,
        green: u8,
        blue: u8,
    },
    RgbLedShow { port: u8, slot: u8 },
    SevenSegment { port: u8, number: f32 },
    /// Scroll text on an LED matrix. `y` counts rows from the top.
    MatrixText { port: u8, x: i8, y: i8, text: String },
    /// Draw raw column bitmaps on an LED matrix. `y` counts rows from the top.
    MatrixBitmap {
        port: u8,
        x: i8,
        y: i8,
        columns: Vec<u8>,
    },
    Shutter { port: u8, on: bool },
    Focus { port: u8, on: bool },
}

impl Message {
    /// Sensor read with the sensor's own device code and no extra parameter.
    pub fn read(sensor: Sensor, port: u8) -> Self {
        Message::SensorRead {
            sensor,
            port,
            device_id: None,
            extra: None,
        }
    }

    /// Sensor read with a trailing parameter.
    pub fn read_with(sensor: Sensor, port: u8, extra: u8) -> Self {
        Message::SensorRead {
            sensor,
            port,
            device_id: None,
            extra: Some(extra),
        }
    }

    /// Catalog name of the message.
    pub fn name(&self) -> &'static str {
        match self {
            Message::SensorRead { sensor, .. } => sensor.name(),
            Message::PressureBegin => "pressure_begin",
            Message::MotorRun { .. } => "motor_run",
            Message::MotorMove { .. } => "motor_move",
            Message::ServoRun { .. } => "servo_run",
            Message::EncoderRun { .. } => "encoder_run",
            Message::EncoderMove { .. } => "encoder_move",
            Message::EncoderMoveTo { .. } => "encoder_move_to",
            Message::EncoderZero { .. } => "encoder_zero",
            Message::EncoderPosition { .. } => "encoder_position",
            Message::StepperRun { .. } => "stepper_run",
            Message::StepperMove { .. } => "stepper_move",
            Message::StepperMoveTo { .. } => "stepper_move_to",
            Message::StepperZero { .. } => "stepper_zero",
            Message::RgbLed { .. } => "rgb_led",
            Message::RgbLedShow { .. } => "rgb_led_show",
            Message::SevenSegment { .. } => "seven_segment",
            Message::MatrixText { .. } => "matrix_text",
            Message::MatrixBitmap { .. } => "matrix_bitmap",
            Message::Shutter { .. } => "shutter",
            Message::Focus { .. } => "focus",
        }
    }

    /// Physical port, 0 when the message is not bound to one.
    pub fn port(&self) -> u8 {
        match self {
            Message::SensorRead { port, .. }
            | Message::MotorRun { port, .. }
            | Message::ServoRun { port, .. }
            | Message::StepperMove { port, .. }
            | Message::StepperMoveTo { port, .. }
            | Message::StepperZero { port }
            | Message::RgbLed { port, .. }
            | Message::RgbLedShow { port, .. }
            | Message::SevenSegment { port, .. }
            | Message::MatrixText { port, .. }
            | Message::MatrixBitmap { port, .. }
            | Message::Shutter { port, .. }
            | Message::Focus { port, .. } => *port,
            Message::PressureBegin
            | Message::MotorMove { .. }
            | Message::EncoderRun { .. }
            | Message::EncoderMove { .. }
            | Message::EncoderMoveTo { .. }
            | Message::EncoderZero { .. }
            | Message::EncoderPosition { .. }
            | Message::StepperRun { .. } => 0,
        }
    }

    /// Device code used for the correlation key, 0 when the message has none.
    pub fn device_id(&self) -> u8 {
        match self {
            Message::SensorRead {
                sensor, device_id, ..
            } => device_id.unwrap_or_else(|| sensor.device_id()),
            Message::EncoderRun { .. }
            | Message::EncoderMove { .. }
            | Message::EncoderMoveTo { .. }
            | Message::EncoderZero { .. } => DEVICE_ENCODER,
            Message::EncoderPosition { .. } => DEVICE_ENCODER_POSITION,
            Message::StepperRun { .. }
            | Message::StepperMove { .. }
            | Message::StepperMoveTo { .. }
            | Message::StepperZero { .. } => DEVICE_STEPPER,
            _ => 0,
        }
    }

    /// The 8-bit key a reply to this message would carry.
    ///
    /// Not unique: different messages can share a key.
    pub fn ext_id(&self) -> u8 {
        correlation_key(self.port(), self.device_id())
    }

    /// Whether the board answers this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::SensorRead { .. } | Message::EncoderPosition { .. } => {
                MessageKind::ReadRequest
            }
            _ => MessageKind::FireAndForget,
        }
    }

    /// Key to register under, `None` for fire-and-forget commands.
    pub fn correlation_key(&self) -> Option<u8> {
        match self.kind() {
            MessageKind::ReadRequest => Some(self.ext_id()),
            MessageKind::FireAndForget => None,
        }
    }

    /// Frame body: everything after the length byte.
    pub fn body(&self) -> Bytes {
        let mut body = BytesMut::with_capacity(16);
        match self {
            Message::SensorRead { port, extra, .. } => {
                body.put_slice(&[self.ext_id(), ACTION_READ, self.device_id(), *port]);
                if let Some(extra) = extra {
                    body.put_u8(*extra);
                }
            }
            Message::PressureBegin => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_PRESSURE]);
            }
            Message::MotorRun { port, speed } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_MOTOR, *port]);
                body.put_slice(&encode_i16(*speed));
            }
            Message::MotorMove { left, right } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_MOTOR_PAIR]);
                body.put_slice(&encode_i16(left.wrapping_neg()));
                body.put_slice(&encode_i16(*right));
            }
            Message::ServoRun { port, slot, angle } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_SERVO, *port, *slot, *angle]);
            }
            Message::EncoderRun { slot, speed } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_ENCODER, MOTION_RUN, *slot]);
                body.put_slice(&encode_i16(*speed));
            }
            Message::EncoderMove {
                slot,
                speed,
                distance,
            } => self.put_motion(&mut body, DEVICE_ENCODER, MOTION_MOVE, *slot, *distance, *speed),
            Message::EncoderMoveTo {
                slot,
                speed,
                position,
            } => self.put_motion(
                &mut body,
                DEVICE_ENCODER,
                MOTION_MOVE_TO,
                *slot,
                *position,
                *speed,
            ),
            Message::EncoderZero { slot } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_ENCODER, MOTION_ZERO, *slot]);
            }
            Message::EncoderPosition { slot } => {
                body.put_slice(&[
                    self.ext_id(),
                    ACTION_READ,
                    DEVICE_ENCODER_POSITION,
                    0x00,
                    *slot,
                    0x02,
                ]);
            }
            Message::StepperRun { slot, speed } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_STEPPER, MOTION_RUN, *slot]);
                body.put_slice(&encode_i16(*speed));
            }
            Message::StepperMove {
                port,
                speed,
                distance,
            } => self.put_motion(&mut body, DEVICE_STEPPER, MOTION_MOVE, *port, *distance, *speed),
            Message::StepperMoveTo {
                port,
                speed,
                position,
            } => self.put_motion(
                &mut body,
                DEVICE_STEPPER,
                MOTION_MOVE_TO,
                *port,
                *position,
                *speed,
            ),
            Message::StepperZero { port } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_STEPPER, MOTION_ZERO, *port]);
            }
            Message::RgbLed {
                port,
                slot,
                index,
                red,
                green,
                blue,
            } => {
                body.put_slice(&[
                    0x00,
                    ACTION_RUN,
                    DEVICE_RGB_LED,
                    *port,
                    *slot,
                    *index,
                    *red,
                    *green,
                    *blue,
                ]);
            }
            Message::RgbLedShow { port, slot } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_RGB_LED_SHOW, *port, *slot]);
            }
            Message::SevenSegment { port, number } => {
                body.put_slice(&[0x00, ACTION_RUN, DEVICE_SEVEN_SEGMENT, *port]);
                body.put_slice(&encode_f32(*number));
            }
            Message::MatrixText { port, x, y, text } => {
                let chars = latin1(text, MAX_BODY - MATRIX_TEXT_HEADER);
                body.put_slice(&[
                    0x00,
                    ACTION_RUN,
                    DEVICE_LED_MATRIX,
                    *port,
                    MATRIX_TEXT,
                    *x as u8,
                    matrix_row(*y),
                    chars.len() as u8,
                ]);
                body.put_slice(&chars);
            }
            Message::MatrixBitmap {
                port,
                x,
                y,
                columns,
            } => {
                body.put_slice(&[
                    0x00,
                    ACTION_RUN,
                    DEVICE_LED_MATRIX,
                    *port,
                    MATRIX_BITMAP,
                    *x as u8,
                    matrix_row(*y),
                ]);
                body.put_slice(columns);
            }
            Message::Shutter { port, on } => {
                let state = if *on { 1 } else { 2 };
                body.put_slice(&[0x00, ACTION_SET, DEVICE_SHUTTER, *port, state]);
            }
            Message::Focus { port, on } => {
                let state = if *on { 3 } else { 4 };
                body.put_slice(&[0x00, ACTION_SET, DEVICE_SHUTTER, *port, state]);
            }
        }
        body.freeze()
    }

    /// The complete outbound frame, `FF 55 <len> <body>`.
    pub fn encode(&self) -> Result<Bytes> {
        let body = self.body();
        let mut frame = BytesMut::with_capacity(body.len() + 3);
        encode_frame(&body, &mut frame)?;
        Ok(frame.freeze())
    }

    fn put_motion(
        &self,
        body: &mut BytesMut,
        device: u8,
        motion: u8,
        target: u8,
        distance: i32,
        speed: i16,
    ) {
        body.put_slice(&[self.ext_id(), ACTION_RUN, device, motion, target]);
        body.put_slice(&encode_i32(distance));
        body.put_slice(&encode_i16(speed));
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port() {
            0 => write!(f, "<{}>", self.name()),
            port => write!(f, "<{} port={port}>", self.name()),
        }
    }
}

/// Correlation key for a port/device pair.
///
/// `port` alone when there is no device code, the device code alone when
/// there is no port, otherwise `(port << 4) + device` truncated to 8 bits.
pub fn correlation_key(port: u8, device_id: u8) -> u8 {
    match (port, device_id) {
        (port, 0) => port,
        (0, device_id) => device_id,
        (port, device_id) => (u16::from(port) << 4).wrapping_add(u16::from(device_id)) as u8,
    }
}

fn matrix_row(y: i8) -> u8 {
    MATRIX_TOP_ROW.wrapping_sub(y) as u8
}

// Characters outside Latin-1 cannot be shown by the firmware font.
fn latin1(text: &str, max: usize) -> Vec<u8> {
    text.chars()
        .take(max)
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;

    fn hex(message: &Message) -> Vec<u8> {
        message.encode().unwrap().to_vec()
    }

    #[test]
    fn ultrasonic_read_on_port_ten() {
        let message = Message::read(Sensor::Ultrasonic, 10);
        assert_eq!(message.ext_id(), 161);
        assert_eq!(message.correlation_key(), Some(161));
        assert_eq!(hex(&message), vec![0xFF, 0x55, 0x04, 0xA1, 0x01, 0x01, 0x0A]);
    }

    #[test]
    fn read_with_extra_counts_it_in_length() {
        let message = Message::read_with(Sensor::Gyro, 0, 2);
        assert_eq!(message.ext_id(), 6);
        assert_eq!(hex(&message), vec![0xFF, 0x55, 0x05, 0x06, 0x01, 0x06, 0x00, 0x02]);
    }

    #[test]
    fn device_id_override_changes_key_and_body() {
        let message = Message::SensorRead {
            sensor: Sensor::Light,
            port: 6,
            device_id: Some(0x20),
            extra: None,
        };
        assert_eq!(message.device_id(), 0x20);
        assert_eq!(message.ext_id(), 0x80);
        assert_eq!(hex(&message), vec![0xFF, 0x55, 0x04, 0x80, 0x01, 0x20, 0x06]);
    }

    #[test]
    fn correlation_key_rules() {
        assert_eq!(correlation_key(3, 0), 3);
        assert_eq!(correlation_key(0, 62), 62);
        assert_eq!(correlation_key(10, 1), 161);
        // (15 << 4) + 29 = 269, truncated
        assert_eq!(correlation_key(15, 29), 13);
    }

    #[test]
    fn commands_are_fire_and_forget() {
        let commands = [
            Message::PressureBegin,
            Message::MotorRun { port: 1, speed: 100 },
            Message::EncoderMove {
                slot: 1,
                speed: 100,
                distance: 360,
            },
            Message::StepperMoveTo {
                port: 1,
                speed: 100,
                position: 0,
            },
            Message::Shutter { port: 1, on: true },
        ];
        for command in commands {
            assert_eq!(command.kind(), MessageKind::FireAndForget, "{command}");
            assert_eq!(command.correlation_key(), None);
        }
        assert_eq!(
            Message::EncoderPosition { slot: 1 }.correlation_key(),
            Some(DEVICE_ENCODER_POSITION)
        );
    }

    #[test]
    fn motor_and_servo_bodies() {
        assert_eq!(
            hex(&Message::PressureBegin),
            vec![0xFF, 0x55, 0x03, 0x00, 0x02, 0x1D]
        );
        assert_eq!(
            hex(&Message::MotorRun { port: 1, speed: -100 }),
            vec![0xFF, 0x55, 0x06, 0x00, 0x02, 0x0A, 0x01, 0x9C, 0xFF]
        );
        assert_eq!(
            hex(&Message::MotorMove {
                left: 100,
                right: 100
            }),
            vec![0xFF, 0x55, 0x07, 0x00, 0x02, 0x05, 0x9C, 0xFF, 0x64, 0x00]
        );
        assert_eq!(
            hex(&Message::ServoRun {
                port: 6,
                slot: 1,
                angle: 90
            }),
            vec![0xFF, 0x55, 0x06, 0x00, 0x02, 0x0B, 0x06, 0x01, 0x5A]
        );
    }

    #[test]
    fn motor_move_negation_wraps_at_minimum() {
        let body = Message::MotorMove {
            left: i16::MIN,
            right: 0,
        }
        .body();
        assert_eq!(&body[3..5], &encode_i16(i16::MIN));
    }

    #[test]
    fn encoder_bodies() {
        assert_eq!(
            hex(&Message::EncoderRun { slot: 1, speed: 200 }),
            vec![0xFF, 0x55, 0x07, 0x00, 0x02, 0x3E, 0x02, 0x01, 0xC8, 0x00]
        );
        assert_eq!(
            hex(&Message::EncoderMove {
                slot: 2,
                speed: 100,
                distance: 360
            }),
            vec![
                0xFF, 0x55, 0x0B, 0x3E, 0x02, 0x3E, 0x01, 0x02, 0x68, 0x01, 0x00, 0x00, 0x64, 0x00
            ]
        );
        assert_eq!(
            hex(&Message::EncoderMoveTo {
                slot: 1,
                speed: 50,
                position: -1
            }),
            vec![
                0xFF, 0x55, 0x0B, 0x3E, 0x02, 0x3E, 0x06, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x32, 0x00
            ]
        );
        assert_eq!(
            hex(&Message::EncoderZero { slot: 1 }),
            vec![0xFF, 0x55, 0x05, 0x00, 0x02, 0x3E, 0x04, 0x01]
        );
        assert_eq!(
            hex(&Message::EncoderPosition { slot: 2 }),
            vec![0xFF, 0x55, 0x06, 0x3D, 0x01, 0x3D, 0x00, 0x02, 0x02]
        );
    }

    #[test]
    fn stepper_bodies() {
        assert_eq!(
            hex(&Message::StepperRun { slot: 1, speed: 1 }),
            vec![0xFF, 0x55, 0x07, 0x00, 0x02, 0x4C, 0x02, 0x01, 0x01, 0x00]
        );
        // port 1: (1 << 4) + 76 = 92
        assert_eq!(
            hex(&Message::StepperMove {
                port: 1,
                speed: 10,
                distance: 1
            }),
            vec![
                0xFF, 0x55, 0x0B, 0x5C, 0x02, 0x4C, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x0A, 0x00
            ]
        );
        assert_eq!(
            hex(&Message::StepperMoveTo {
                port: 2,
                speed: 10,
                position: 2
            })[3..8],
            [0x6C, 0x02, 0x4C, 0x06, 0x02]
        );
        assert_eq!(
            hex(&Message::StepperZero { port: 3 }),
            vec![0xFF, 0x55, 0x05, 0x00, 0x02, 0x4C, 0x04, 0x03]
        );
    }

    #[test]
    fn rgb_led_length_matches_body() {
        let frame = hex(&Message::RgbLed {
            port: 7,
            slot: 2,
            index: 0,
            red: 255,
            green: 16,
            blue: 0,
        });
        assert_eq!(
            frame,
            vec![0xFF, 0x55, 0x09, 0x00, 0x02, 0x12, 0x07, 0x02, 0x00, 0xFF, 0x10, 0x00]
        );
        assert_eq!(frame[2] as usize, frame.len() - 3);

        assert_eq!(
            hex(&Message::RgbLedShow { port: 7, slot: 2 }),
            vec![0xFF, 0x55, 0x05, 0x00, 0x02, 0x13, 0x07, 0x02]
        );
    }

    #[test]
    fn seven_segment_carries_float() {
        assert_eq!(
            hex(&Message::SevenSegment {
                port: 4,
                number: 1.0
            }),
            vec![0xFF, 0x55, 0x08, 0x00, 0x02, 0x09, 0x04, 0x00, 0x00, 0x80, 0x3F]
        );
    }

    #[test]
    fn matrix_text_flips_row_and_prefixes_length() {
        let frame = hex(&Message::MatrixText {
            port: 1,
            x: -2,
            y: 0,
            text: "Hi".to_string(),
        });
        assert_eq!(
            frame,
            vec![0xFF, 0x55, 0x0A, 0x00, 0x02, 0x29, 0x01, 0x01, 0xFE, 0x07, 0x02, b'H', b'i']
        );
    }

    #[test]
    fn matrix_text_replaces_wide_chars_and_caps_length() {
        let body = Message::MatrixText {
            port: 1,
            x: 0,
            y: 7,
            text: "a\u{e9}\u{2603}".to_string(),
        }
        .body();
        assert_eq!(body[6], 0);
        assert_eq!(&body[7..], &[3, b'a', 0xE9, b'?']);

        let long = Message::MatrixText {
            port: 1,
            x: 0,
            y: 0,
            text: "x".repeat(400),
        };
        let frame = long.encode().unwrap();
        assert_eq!(frame[2], 0xFF);
        assert_eq!(frame[10] as usize, MAX_BODY - MATRIX_TEXT_HEADER);
    }

    #[test]
    fn matrix_bitmap_rejects_oversized_columns() {
        let ok = Message::MatrixBitmap {
            port: 1,
            x: 0,
            y: 0,
            columns: vec![0x81, 0x42],
        };
        assert_eq!(
            hex(&ok),
            vec![0xFF, 0x55, 0x09, 0x00, 0x02, 0x29, 0x01, 0x02, 0x00, 0x07, 0x81, 0x42]
        );

        let too_big = Message::MatrixBitmap {
            port: 1,
            x: 0,
            y: 0,
            columns: vec![0; 300],
        };
        assert!(matches!(
            too_big.encode(),
            Err(LinkError::Frame(megalink_frame::FrameError::BodyTooLarge { .. }))
        ));
    }

    #[test]
    fn camera_lines() {
        assert_eq!(
            hex(&Message::Shutter { port: 3, on: true }),
            vec![0xFF, 0x55, 0x05, 0x00, 0x03, 0x14, 0x03, 0x01]
        );
        assert_eq!(hex(&Message::Shutter { port: 3, on: false })[7], 2);
        assert_eq!(hex(&Message::Focus { port: 3, on: true })[7], 3);
        assert_eq!(hex(&Message::Focus { port: 3, on: false })[7], 4);
    }

    #[test]
    fn display_includes_port_when_bound() {
        assert_eq!(
            Message::read(Sensor::Ultrasonic, 10).to_string(),
            "<ultrasonic port=10>"
        );
        assert_eq!(Message::EncoderZero { slot: 1 }.to_string(), "<encoder_zero>");
    }
}
