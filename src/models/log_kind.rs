//! Log kinds and the per-user bundle of all three log tables

use rusqlite::Connection;
use serde::Serialize;

use super::{ExerciseLog, FoodLog, SleepLog};
use crate::db::DbResult;

/// The three kinds of user log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Food,
    Exercise,
    Sleep,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Food => "food",
            LogKind::Exercise => "exercise",
            LogKind::Sleep => "sleep",
        }
    }

    /// Parse a kind name, ignoring case
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "food" => Some(LogKind::Food),
            "exercise" => Some(LogKind::Exercise),
            "sleep" => Some(LogKind::Sleep),
            _ => None,
        }
    }
}

/// Logs of one kind, serialized as a plain array
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LogList {
    Food(Vec<FoodLog>),
    Exercise(Vec<ExerciseLog>),
    Sleep(Vec<SleepLog>),
}

impl LogList {
    pub fn len(&self) -> usize {
        match self {
            LogList::Food(logs) => logs.len(),
            LogList::Exercise(logs) => logs.len(),
            LogList::Sleep(logs) => logs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// List a user's logs of one kind, newest first
pub fn list_logs(conn: &Connection, user_id: i64, kind: LogKind) -> DbResult<LogList> {
    Ok(match kind {
        LogKind::Food => LogList::Food(FoodLog::list_for_user(conn, user_id)?),
        LogKind::Exercise => LogList::Exercise(ExerciseLog::list_for_user(conn, user_id)?),
        LogKind::Sleep => LogList::Sleep(SleepLog::list_for_user(conn, user_id)?),
    })
}

/// Every log a user has, each list newest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserLogs {
    pub food: Vec<FoodLog>,
    pub exercise: Vec<ExerciseLog>,
    pub sleep: Vec<SleepLog>,
}

impl UserLogs {
    /// Load all three kinds for a user
    pub fn load(conn: &Connection, user_id: i64) -> DbResult<Self> {
        Ok(Self {
            food: FoodLog::list_for_user(conn, user_id)?,
            exercise: ExerciseLog::list_for_user(conn, user_id)?,
            sleep: SleepLog::list_for_user(conn, user_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{conn, seed_user};
    use crate::models::{FoodLogCreate, SleepLogCreate};

    #[test]
    fn test_kind_parsing() {
        assert_eq!(LogKind::from_str("Food"), Some(LogKind::Food));
        assert_eq!(LogKind::from_str("sleep"), Some(LogKind::Sleep));
        assert_eq!(LogKind::from_str("meals"), None);
        assert_eq!(LogKind::from_str(""), None);
    }

    #[test]
    fn test_load_and_list_by_kind() {
        let conn = conn();
        let user = seed_user(&conn, "k@example.com");
        FoodLog::create(
            &conn,
            user.id,
            &FoodLogCreate {
                nama_makanan: "Nasi".to_string(),
                kalori: 200,
                tanggal: "2025-01-01".to_string(),
            },
        )
        .unwrap();
        SleepLog::create(
            &conn,
            user.id,
            &SleepLogCreate {
                tanggal: "2025-01-02".to_string(),
                waktu_tidur: "2025-01-01T23:00:00Z".to_string(),
                waktu_bangun: "2025-01-02T07:00:00Z".to_string(),
                kualitas_tidur: None,
            },
        )
        .unwrap();

        let logs = UserLogs::load(&conn, user.id).unwrap();
        assert_eq!(logs.food.len(), 1);
        assert!(logs.exercise.is_empty());
        assert_eq!(logs.sleep.len(), 1);

        let food = list_logs(&conn, user.id, LogKind::Food).unwrap();
        assert_eq!(food.len(), 1);
        let json = serde_json::to_value(&food).unwrap();
        assert_eq!(json[0]["nama_makanan"], "Nasi");
        assert!(list_logs(&conn, user.id, LogKind::Exercise).unwrap().is_empty());
    }
}
