use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
//
// 历史数据中角色以法语标签存储（etudiant / professeur / administration /
// directeur），FromStr 保留这些别名以兼容旧导入。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student,    // 学生
    Instructor, // 授课教师
    StaffAdmin, // 教务管理员
    Director,   // 校长/主任
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const STAFF_ADMIN: &'static str = "staff_admin";
    pub const DIRECTOR: &'static str = "director";

    pub fn director_roles() -> &'static [&'static UserRole] {
        &[&Self::Director]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::StaffAdmin, &Self::Director]
    }
    pub fn instructor_roles() -> &'static [&'static UserRole] {
        &[&Self::Instructor, &Self::StaffAdmin, &Self::Director]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Student,
            &Self::Instructor,
            &Self::StaffAdmin,
            &Self::Director,
        ]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, instructor, staff_admin, director"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Instructor => write!(f, "{}", UserRole::INSTRUCTOR),
            UserRole::StaffAdmin => write!(f, "{}", UserRole::STAFF_ADMIN),
            UserRole::Director => write!(f, "{}", UserRole::DIRECTOR),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT | "etudiant" => Ok(UserRole::Student),
            UserRole::INSTRUCTOR | "professeur" | "enseignant" => Ok(UserRole::Instructor),
            UserRole::STAFF_ADMIN | "administration" => Ok(UserRole::StaffAdmin),
            UserRole::DIRECTOR | "directeur" => Ok(UserRole::Director),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: String,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成访问令牌
    pub async fn generate_access_token(&self) -> String {
        match crate::utils::jwt::JwtUtils::generate_access_token(self.id, &self.role.to_string()) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("JWT token generation failed: {}", e);
                format!(
                    "fallback_token_{}_{}",
                    self.id,
                    chrono::Utc::now().timestamp()
                )
            }
        }
    }

    // 生成刷新令牌
    pub async fn generate_refresh_token(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> String {
        match crate::utils::jwt::JwtUtils::generate_refresh_token(
            self.id,
            &self.role.to_string(),
            refresh_token_expiry,
        ) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("JWT refresh token generation failed: {}", e);
                format!(
                    "fallback_refresh_token_{}_{}",
                    self.id,
                    chrono::Utc::now().timestamp()
                )
            }
        }
    }

    // 生成 token 对（access + refresh）
    pub async fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role.to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("Token pair generation failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in UserRole::all_roles() {
            let parsed = role.to_string().parse::<UserRole>().unwrap();
            assert_eq!(&&parsed, role);
        }
    }

    #[test]
    fn test_legacy_french_aliases() {
        assert_eq!("etudiant".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!(
            "professeur".parse::<UserRole>().unwrap(),
            UserRole::Instructor
        );
        assert_eq!(
            "enseignant".parse::<UserRole>().unwrap(),
            UserRole::Instructor
        );
        assert_eq!(
            "administration".parse::<UserRole>().unwrap(),
            UserRole::StaffAdmin
        );
        assert_eq!("directeur".parse::<UserRole>().unwrap(), UserRole::Director);
    }

    #[test]
    fn test_legacy_alias_serializes_canonical() {
        let role = "directeur".parse::<UserRole>().unwrap();
        assert_eq!(role.to_string(), "director");
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("wizard".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_staff_roles_exclude_instructor() {
        assert!(!UserRole::staff_roles().contains(&&UserRole::Instructor));
        assert!(UserRole::instructor_roles().contains(&&UserRole::Instructor));
    }
}
