use super::{read_array, CodecError};

/// Transaction mortality window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    Immortal,
    /// Valid for `period` blocks starting at the block whose number is `phase` modulo `period`.
    Mortal { period: u64, phase: u64 },
}

impl Era {
    /// Creates a mortal era for `period` blocks anchored at `current_block`.
    ///
    /// The period is rounded up to a power of two and clamped to `4..=65536`.
    pub fn mortal(period: u64, current_block: u64) -> Self {
        let period = period.checked_next_power_of_two().unwrap_or(1 << 16).clamp(4, 1 << 16);
        let phase = current_block % period;
        let quantize_factor = (period >> 12).max(1);
        let quantized_phase = phase / quantize_factor * quantize_factor;
        Era::Mortal {
            period,
            phase: quantized_phase,
        }
    }

    pub fn period(&self) -> Option<u64> {
        match self {
            Era::Immortal => None,
            Era::Mortal { period, .. } => Some(*period),
        }
    }

    /// First block at which the transaction is valid, relative to `current`.
    pub fn birth(&self, current: u64) -> u64 {
        match self {
            Era::Immortal => 0,
            Era::Mortal { period, phase } => {
                (current.max(*phase) - phase) / period * period + phase
            }
        }
    }

    /// First block at which the transaction is no longer valid.
    pub fn death(&self, current: u64) -> u64 {
        match self {
            Era::Immortal => u64::MAX,
            Era::Mortal { period, .. } => self.birth(current) + period,
        }
    }

    pub fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            Era::Immortal => out.push(0),
            Era::Mortal { period, phase } => {
                let quantize_factor = (*period >> 12).max(1);
                let encoded_period = (period.trailing_zeros().saturating_sub(1)).clamp(1, 15) as u16;
                let quantized_phase = (*phase / quantize_factor) as u16;
                let encoded = encoded_period | (quantized_phase << 4);
                out.extend_from_slice(&encoded.to_le_bytes());
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2);
        self.encode_to(&mut out);
        out
    }

    pub fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let [first] = read_array::<1>(input)?;
        if first == 0 {
            return Ok(Era::Immortal);
        }
        let [second] = read_array::<1>(input)?;
        let encoded = first as u64 + ((second as u64) << 8);
        let period = 2u64 << (encoded % (1 << 4));
        let quantize_factor = (period >> 12).max(1);
        let phase = (encoded >> 4) * quantize_factor;
        if period >= 4 && phase < period {
            Ok(Era::Mortal { period, phase })
        } else {
            Err(CodecError::Scale("Invalid period and phase".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immortal_is_single_zero_byte() {
        assert_eq!(Era::Immortal.encode(), vec![0]);
        let mut input: &[u8] = &[0];
        assert_eq!(Era::decode(&mut input).unwrap(), Era::Immortal);
    }

    #[test]
    fn test_known_mortal_encoding() {
        let era = Era::mortal(64, 3933);
        assert_eq!(era, Era::Mortal { period: 64, phase: 29 });
        assert_eq!(hex::encode(era.encode()), "d501");

        let bytes = era.encode();
        let mut input = bytes.as_slice();
        assert_eq!(Era::decode(&mut input).unwrap(), era);
    }

    #[test]
    fn test_period_is_rounded_and_clamped() {
        assert_eq!(Era::mortal(60, 0).period(), Some(64));
        assert_eq!(Era::mortal(1, 0).period(), Some(4));
        assert_eq!(Era::mortal(1 << 20, 0).period(), Some(1 << 16));
    }

    #[test]
    fn test_large_period_quantizes_phase() {
        let era = Era::mortal(1 << 16, 70_001);
        let bytes = era.encode();
        let mut input = bytes.as_slice();
        assert_eq!(Era::decode(&mut input).unwrap(), era);
    }

    #[test]
    fn test_birth_and_death() {
        let era = Era::mortal(64, 3933);
        assert_eq!(era.birth(3933), 3933);
        assert_eq!(era.death(3933), 3997);
        assert_eq!(Era::Immortal.death(10), u64::MAX);
    }

    #[test]
    fn test_truncated_era_fails() {
        let mut input: &[u8] = &[0xd5];
        assert!(Era::decode(&mut input).is_err());
    }
}
