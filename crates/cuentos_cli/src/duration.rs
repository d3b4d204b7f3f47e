use std::str::FromStr;
use std::time::Duration;

/// Durations written as `2s`, `1m30s`, `1d` or a bare number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| format!("Duration too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // a trailing bare number counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_durations() {
        assert_eq!("2s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(2));
        assert_eq!("1m30s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert_eq!("1h 5m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(3900));
        assert_eq!("0".parse::<HumanDuration>().unwrap().0, Duration::ZERO);
        assert_eq!("1d".parse::<HumanDuration>().unwrap().0, Duration::from_secs(86400));
        assert_eq!("7".parse::<HumanDuration>().unwrap().0, Duration::from_secs(7));
    }

    #[test]
    fn test_reject_invalid_durations() {
        assert!("".parse::<HumanDuration>().is_err());
        assert!("s".parse::<HumanDuration>().is_err());
        assert!("3w".parse::<HumanDuration>().is_err());
        assert!("2x".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_reject_overflowing_durations() {
        assert!("99999999999999999d".parse::<HumanDuration>().is_err());
        assert!("18446744073709551615s 1s".parse::<HumanDuration>().is_err());
        assert!("18446744073709551615s1".parse::<HumanDuration>().is_err());
        assert_eq!(
            "18446744073709551615".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(u64::MAX)
        );
    }
}
