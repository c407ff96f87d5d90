// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Encoding helper for fixed-size byte arrays (keys, asset codes, reserved fields)
pub(crate) mod arr {
    use encdec::Error;

    pub fn enc<const N: usize>(d: &[u8; N], buff: &mut [u8]) -> Result<usize, Error> {
        if buff.len() < d.len() {
            return Err(Error::Length);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn enc_len<const N: usize>(d: &[u8; N]) -> Result<usize, Error> {
        Ok(d.len())
    }

    pub fn dec<const N: usize>(buff: &[u8]) -> Result<([u8; N], usize), Error> {
        if buff.len() < N {
            return Err(Error::Length);
        }

        let mut d = [0u8; N];
        d.copy_from_slice(&buff[..N]);

        Ok((d, N))
    }
}

/// Encoding helper for u8 enumerations using `num_enum`
pub(crate) mod enum_u8 {
    use ledger_proto::ApduError;
    use num_enum::TryFromPrimitive;

    pub fn enc<E: Copy + Into<u8>>(e: &E, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = (*e).into();

        Ok(1)
    }

    pub fn enc_len<E>(_e: &E) -> Result<usize, ApduError> {
        Ok(1)
    }

    pub fn dec<E: TryFromPrimitive<Primitive = u8>>(buff: &[u8]) -> Result<(E, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        match E::try_from_primitive(buff[0]) {
            Ok(v) => Ok((v, 1)),
            Err(_) => Err(ApduError::InvalidEncoding),
        }
    }
}
