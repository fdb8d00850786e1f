use std::io::Write;

use crate::protocol::SerializeError;

/// Forward-only little-endian writer for the baked format.
pub struct BinaryWriter<W> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), SerializeError> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), SerializeError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), SerializeError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), SerializeError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), SerializeError> {
        self.write_u8(u8::from(value))
    }

    /// Write a collection length or string byte count as a `u32`.
    pub fn write_len(&mut self, len: usize) -> Result<(), SerializeError> {
        let len = u32::try_from(len).map_err(|_| SerializeError::LengthOverflow(len))?;
        self.write_u32(len)
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), SerializeError> {
        self.write_len(value.len())?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_little_endian() {
        let mut writer = BinaryWriter::new(Vec::new());
        writer.write_u32(0x0403_0201).unwrap();
        writer.write_i32(-2).unwrap();
        writer.write_bool(true).unwrap();
        writer.write_str("ab").unwrap();

        assert_eq!(
            writer.into_inner(),
            [1, 2, 3, 4, 0xfe, 0xff, 0xff, 0xff, 1, 2, 0, 0, 0, b'a', b'b']
        );
    }

    #[test]
    fn test_f32_bits() {
        let mut writer = BinaryWriter::new(Vec::new());
        writer.write_f32(1.5).unwrap();
        assert_eq!(writer.into_inner(), 1.5f32.to_le_bytes());
    }
}
