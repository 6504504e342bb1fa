//! 消息帧格式
//!
//! 每条消息为: [4 字节大端 u32 长度][JSON 载荷]

use crate::error::TransportError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// 单条消息的最大字节数（4 MiB），命令输出较大时也足够
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// 读取一条带长度前缀的消息
pub async fn read_message<R>(reader: &mut R, max_size: usize) -> Result<Vec<u8>, TransportError>
where
    R: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(TransportError::ConnectionClosed);
        }
        Err(e) => return Err(TransportError::Io(e)),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > max_size {
        return Err(TransportError::MessageTooLarge {
            size: len,
            max: max_size,
        });
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            TransportError::ConnectionClosed
        } else {
            TransportError::Io(e)
        }
    })?;

    Ok(buf)
}

/// 写入一条带长度前缀的消息
pub async fn write_message<W>(writer: &mut W, data: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWriteExt + Unpin,
{
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(TransportError::MessageTooLarge {
            size: data.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    let len = (data.len() as u32).to_be_bytes();
    writer.write_all(&len).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// 读取并反序列化一条 JSON 消息
pub async fn read_json<R, T>(reader: &mut R) -> Result<T, TransportError>
where
    R: AsyncReadExt + Unpin,
    T: DeserializeOwned,
{
    let payload = read_message(reader, MAX_MESSAGE_SIZE).await?;
    serde_json::from_slice(&payload).map_err(|e| TransportError::InvalidMessage(e.to_string()))
}

/// 序列化并写入一条 JSON 消息
pub async fn write_json<W, T>(writer: &mut W, value: &T) -> Result<(), TransportError>
where
    W: AsyncWriteExt + Unpin,
    T: Serialize,
{
    let payload =
        serde_json::to_vec(value).map_err(|e| TransportError::InvalidMessage(e.to_string()))?;
    write_message(writer, &payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_frame_layout() {
        let mut buffer = Vec::new();
        write_message(&mut buffer, b"hello world").await.unwrap();

        assert_eq!(&buffer[0..4], &[0, 0, 0, 11]);
        assert_eq!(&buffer[4..], b"hello world");

        let mut cursor = Cursor::new(buffer);
        let payload = read_message(&mut cursor, MAX_MESSAGE_SIZE).await.unwrap();
        assert_eq!(payload, b"hello world");
    }

    #[tokio::test]
    async fn test_message_too_large() {
        let mut data = vec![0u8; 16];
        data[0..4].copy_from_slice(&(64u32).to_be_bytes());
        let mut cursor = Cursor::new(data);

        let result = read_message(&mut cursor, 32).await;
        assert!(matches!(
            result,
            Err(TransportError::MessageTooLarge { size: 64, max: 32 })
        ));
    }

    #[tokio::test]
    async fn test_empty_stream_is_connection_closed() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let result = read_message(&mut cursor, MAX_MESSAGE_SIZE).await;
        assert!(matches!(result, Err(TransportError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_truncated_payload_is_connection_closed() {
        let mut data = (10u32).to_be_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let mut cursor = Cursor::new(data);

        let result = read_message(&mut cursor, MAX_MESSAGE_SIZE).await;
        assert!(matches!(result, Err(TransportError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_invalid_json_payload() {
        let mut buffer = Vec::new();
        write_message(&mut buffer, b"not json").await.unwrap();

        let mut cursor = Cursor::new(buffer);
        let result: Result<serde_json::Value, _> = read_json(&mut cursor).await;
        assert!(matches!(result, Err(TransportError::InvalidMessage(_))));
    }
}
