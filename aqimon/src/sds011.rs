//! SDS011 particulate sensor driver, query mode
//!
//! The SDS011 talks 9600-8N1 over its USB serial adapter. Commands are
//! 19-byte frames:
//!
//! ```text
//! AA B4 <cmd> <data×12> <id_lo> <id_hi> <checksum> AB
//! ```
//!
//! and replies are 10-byte frames:
//!
//! ```text
//! AA <type> <pm25_lo> <pm25_hi> <pm10_lo> <pm10_hi> <id_lo> <id_hi> <checksum> AB
//! ```
//!
//! The checksum is the modulo-256 sum of the payload bytes (command frame:
//! bytes 2..17, reply frame: bytes 2..8). Concentrations arrive as
//! little-endian tenths of a µg/m³. The driver addresses all sensors
//! (`id = FF FF`) since exactly one device hangs off the port.
//!
//! Query mode is used instead of the factory-default active mode so the
//! device only measures when asked, and the fan (rated ~8000 h) is put to
//! sleep between polls.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use aqimon_core::{Sample, SensorError, SensorReader, SensorResult};

/// Fixed SDS011 line rate
pub const BAUD_RATE: u32 = 9600;

const FRAME_HEAD: u8 = 0xAA;
const FRAME_TAIL: u8 = 0xAB;
const CMD_MARKER: u8 = 0xB4;
const REPLY_QUERY: u8 = 0xC0;

const CMD_QUERY: u8 = 0x04;
const CMD_SLEEP_SET: u8 = 0x06;
const SLEEP_WRITE: u8 = 0x01;
const MODE_SLEEP: u8 = 0x00;
const MODE_WORK: u8 = 0x01;

const CMD_LEN: usize = 19;
const REPLY_LEN: usize = 10;

/// Bytes the device may emit before a frame head; stray active-mode frames
/// show up right after wake
const RESYNC_WINDOW: usize = 64;

/// Modulo-256 sum used by both frame directions
fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Build a 19-byte command frame addressed to all sensors
fn command_frame(command: u8, data: &[u8]) -> [u8; CMD_LEN] {
    debug_assert!(data.len() <= 12);
    let mut frame = [0u8; CMD_LEN];
    frame[0] = FRAME_HEAD;
    frame[1] = CMD_MARKER;
    frame[2] = command;
    frame[3..3 + data.len()].copy_from_slice(data);
    frame[15] = 0xFF;
    frame[16] = 0xFF;
    frame[17] = checksum(&frame[2..17]);
    frame[18] = FRAME_TAIL;
    frame
}

/// Decode a query reply into a sample
fn parse_query_reply(frame: &[u8]) -> SensorResult<Sample> {
    if frame.len() < REPLY_LEN {
        return Err(SensorError::ShortRead {
            expected: REPLY_LEN,
            got: frame.len(),
        });
    }
    if frame[0] != FRAME_HEAD || frame[REPLY_LEN - 1] != FRAME_TAIL {
        return Err(SensorError::MalformedFrame {
            reason: "bad frame delimiters",
        });
    }
    if frame[1] != REPLY_QUERY {
        return Err(SensorError::MalformedFrame {
            reason: "unexpected reply type",
        });
    }

    let expected = checksum(&frame[2..8]);
    if frame[8] != expected {
        return Err(SensorError::BadChecksum {
            expected,
            actual: frame[8],
        });
    }

    let pm2_5 = u16::from_le_bytes([frame[2], frame[3]]) as f32 / 10.0;
    let pm10 = u16::from_le_bytes([frame[4], frame[5]]) as f32 / 10.0;
    Sample::new(pm2_5, pm10)
}

/// One SDS011 on a host serial port
pub struct Sds011 {
    port: Box<dyn SerialPort>,
}

impl Sds011 {
    /// Open the serial device the sensor hangs off, e.g. `/dev/ttyUSB0`
    pub fn open(device: &str) -> SensorResult<Self> {
        let port = serialport::new(device, BAUD_RATE)
            .timeout(Duration::from_secs(5))
            .open()
            .map_err(|e| SensorError::Io(e.into()))?;
        Ok(Self { port })
    }

    fn send(&mut self, frame: &[u8; CMD_LEN]) -> SensorResult<()> {
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(())
    }

    /// Read one reply frame, skipping stray bytes until a frame head
    fn read_reply(&mut self) -> SensorResult<[u8; REPLY_LEN]> {
        let mut frame = [0u8; REPLY_LEN];
        for _ in 0..RESYNC_WINDOW {
            let mut byte = [0u8; 1];
            self.port.read_exact(&mut byte)?;
            if byte[0] == FRAME_HEAD {
                frame[0] = FRAME_HEAD;
                self.port.read_exact(&mut frame[1..])?;
                return Ok(frame);
            }
        }
        Err(SensorError::MalformedFrame {
            reason: "no frame head within resync window",
        })
    }
}

impl SensorReader for Sds011 {
    fn read(&mut self) -> SensorResult<Sample> {
        self.send(&command_frame(CMD_QUERY, &[]))?;
        let frame = self.read_reply()?;
        parse_query_reply(&frame)
    }

    fn wake(&mut self) -> SensorResult<()> {
        self.send(&command_frame(CMD_SLEEP_SET, &[SLEEP_WRITE, MODE_WORK]))?;
        // A waking sensor acknowledges with a command reply, but some
        // firmware revisions stay silent until the fan is up; discard
        // whatever arrives
        let _ = self.read_reply();
        Ok(())
    }

    fn sleep(&mut self) -> SensorResult<()> {
        self.send(&command_frame(CMD_SLEEP_SET, &[SLEEP_WRITE, MODE_SLEEP]))?;
        let _ = self.read_reply();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reply frame for the given raw (tenths of µg/m³) readings
    fn reply_frame(pm2_5_raw: u16, pm10_raw: u16) -> [u8; REPLY_LEN] {
        let pm25 = pm2_5_raw.to_le_bytes();
        let pm10 = pm10_raw.to_le_bytes();
        let mut frame = [
            FRAME_HEAD,
            REPLY_QUERY,
            pm25[0],
            pm25[1],
            pm10[0],
            pm10[1],
            0xA1, // device id
            0x60,
            0x00,
            FRAME_TAIL,
        ];
        frame[8] = checksum(&frame[2..8]);
        frame
    }

    #[test]
    fn decodes_golden_frame() {
        // 25.0 and 40.0 µg/m³
        let sample = parse_query_reply(&reply_frame(250, 400)).unwrap();
        assert_eq!(sample.pm2_5, 25.0);
        assert_eq!(sample.pm10, 40.0);
        assert_eq!(sample.aqi, None);
    }

    #[test]
    fn rejects_checksum_mismatch() {
        let mut frame = reply_frame(250, 400);
        frame[8] = frame[8].wrapping_add(1);
        assert!(matches!(
            parse_query_reply(&frame),
            Err(SensorError::BadChecksum { .. })
        ));
    }

    #[test]
    fn rejects_bad_delimiters() {
        let mut frame = reply_frame(250, 400);
        frame[9] = 0x00;
        assert!(matches!(
            parse_query_reply(&frame),
            Err(SensorError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn rejects_wrong_reply_type() {
        let mut frame = reply_frame(250, 400);
        frame[1] = 0xC5;
        frame[8] = checksum(&frame[2..8]);
        assert!(matches!(
            parse_query_reply(&frame),
            Err(SensorError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn rejects_short_frame() {
        assert!(matches!(
            parse_query_reply(&[FRAME_HEAD, REPLY_QUERY, 0x00]),
            Err(SensorError::ShortRead { expected: 10, got: 3 })
        ));
    }

    #[test]
    fn query_frame_matches_datasheet() {
        let frame = command_frame(CMD_QUERY, &[]);
        assert_eq!(frame.len(), CMD_LEN);
        assert_eq!(frame[0], FRAME_HEAD);
        assert_eq!(frame[1], CMD_MARKER);
        assert_eq!(frame[2], CMD_QUERY);
        assert_eq!(&frame[15..17], &[0xFF, 0xFF]);
        // Documented checksum for the broadcast query command
        assert_eq!(frame[17], 0x02);
        assert_eq!(frame[18], FRAME_TAIL);
    }

    #[test]
    fn wake_and_sleep_frames_match_datasheet() {
        let wake = command_frame(CMD_SLEEP_SET, &[SLEEP_WRITE, MODE_WORK]);
        assert_eq!(wake[2..5], [CMD_SLEEP_SET, SLEEP_WRITE, MODE_WORK]);
        assert_eq!(wake[17], 0x06);

        let sleep = command_frame(CMD_SLEEP_SET, &[SLEEP_WRITE, MODE_SLEEP]);
        assert_eq!(sleep[2..5], [CMD_SLEEP_SET, SLEEP_WRITE, MODE_SLEEP]);
        assert_eq!(sleep[17], 0x05);
    }
}
