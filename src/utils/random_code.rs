use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成通话房间名，全局唯一性由数据库唯一约束兜底
pub fn generate_room_name() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("room-{}", suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_name_shape() {
        let name = generate_room_name();
        assert!(name.starts_with("room-"));
        assert_eq!(name.len(), "room-".len() + 12);
        assert!(
            name["room-".len()..]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_room_names_differ() {
        assert_ne!(generate_room_name(), generate_room_name());
    }
}
