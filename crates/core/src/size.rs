use crate::error::ReclaimError;

const PARSE_UNITS: [char; 9] = ['B', 'K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

const FORMAT_UNITS: [(u64, &str); 5] = [
    (1 << 50, "P"),
    (1 << 40, "T"),
    (1 << 30, "G"),
    (1 << 20, "M"),
    (1 << 10, "K"),
];

/// Parse a human-readable size such as `10G` into a byte count. The
/// input is a decimal integer immediately followed by one unit letter
/// from B/K/M/G/T/P/E/Z/Y (powers of 1024).
pub fn parse_size(input: &str) -> Result<u64, ReclaimError> {
    let trimmed = input.trim();
    let Some(unit) = trimmed.chars().next_back() else {
        return Err(malformed(input, "empty size string"));
    };
    let Some(exponent) = PARSE_UNITS.iter().position(|&known| known == unit) else {
        return Err(malformed(input, "missing or unrecognized unit letter"));
    };

    let digits = &trimmed[..trimmed.len() - unit.len_utf8()];
    let amount = digits
        .parse::<u64>()
        .map_err(|_| malformed(input, "numeric prefix is not a non-negative integer"))?;

    let factor = 1024u128.pow(exponent as u32);
    let value = (amount as u128)
        .checked_mul(factor)
        .ok_or_else(|| malformed(input, "value exceeds the addressable byte range"))?;
    u64::try_from(value).map_err(|_| malformed(input, "value exceeds the addressable byte range"))
}

/// Format a byte count with the largest unit that fits, truncating
/// toward zero. Values under 1 KiB render as `N bytes` (`1 byte`).
pub fn format_size(bytes: u64) -> String {
    for (factor, suffix) in FORMAT_UNITS {
        if bytes >= factor {
            return format!("{}{}", bytes / factor, suffix);
        }
    }
    if bytes == 1 {
        "1 byte".to_string()
    } else {
        format!("{bytes} bytes")
    }
}

fn malformed(input: &str, reason: &str) -> ReclaimError {
    ReclaimError::MalformedSize {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
