use megalink_frame::{FrameReader, FrameWriter};
use megalink_transport::Target;
use tracing::info;

use crate::error::Result;
use crate::link::{Link, LinkConfig};

/// Open `target` and start a link with default configuration.
pub fn open(target: &Target) -> Result<Link> {
    open_with_config(target, &LinkConfig::default())
}

/// Open `target` and start a link.
///
/// The channel is cloned so the reader thread and writers never contend for
/// one handle. Each read blocks for at most `config.serial.timeout`.
pub fn open_with_config(target: &Target, config: &LinkConfig) -> Result<Link> {
    let stream = target.open(&config.serial)?;
    let reader_stream = stream.try_clone()?;
    let transport = stream.transport_name();

    let reader =
        FrameReader::with_read_timeout(reader_stream, config.serial.timeout, config.framer.clone())?;
    let writer = FrameWriter::with_write_timeout(stream, config.write_timeout)?;

    let link = Link::new(reader, writer, config)?;
    info!(%target, transport, "link open");
    Ok(link)
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;
    use std::thread;
    use std::time::Duration;

    use megalink_frame::Value;

    use super::*;
    use crate::error::LinkError;
    use crate::message::Message;
    use crate::sensor::Sensor;

    fn temp_socket(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "megalink-connector-{name}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir.join("board.sock")
    }

    #[test]
    fn open_unix_target_and_read_sensor() {
        let sock_path = temp_socket("read");
        let listener = UnixListener::bind(&sock_path).expect("listener should bind");

        let board = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("board should accept");
            let mut request = [0u8; 7];
            stream.read_exact(&mut request).expect("request should arrive");
            let key = request[3];
            stream
                .write_all(&[0xFF, 0x55, key, 0x03, 0x2C, 0x00, 0x0D, 0x0A])
                .expect("reply should be written");
            request
        });

        let target: Target = format!("unix:{}", sock_path.display()).parse().unwrap();
        let link = open(&target).expect("link should open");
        let value = link
            .request(&Message::read(Sensor::Ultrasonic, 10), Duration::from_secs(2))
            .expect("reply should arrive");

        assert_eq!(value, Value::Short(44));
        assert_eq!(
            board.join().expect("board thread should complete"),
            [0xFF, 0x55, 0x04, 0xA1, 0x01, 0x01, 0x0A]
        );

        link.shutdown();
        if let Some(dir) = sock_path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn open_missing_socket_fails() {
        let target: Target = "unix:/tmp/megalink-no-such-dir/board.sock".parse().unwrap();
        assert!(matches!(open(&target), Err(LinkError::Transport(_))));
    }
}
