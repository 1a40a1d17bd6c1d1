use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PublishError;

// ═══════════════════════════════════════════════════════════════
//  Issue
// ═══════════════════════════════════════════════════════════════

/// GitHub issue, только поля которые уходят в Kafka.
/// Остальные поля исходного JSON игнорируются, отсутствующее или `null`
/// поле получает нулевое значение (0, "").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// API отдаёт `null` для issues без описания.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl Issue {
    /// Сериализовать в payload сообщения: `{"id","title","state","body"}`.
    pub fn encode(&self) -> Result<Vec<u8>, PublishError> {
        serde_json::to_vec(self).map_err(|source| PublishError::Encode { id: self.id, source })
    }
}

// ═══════════════════════════════════════════════════════════════
//  IssueBatch
// ═══════════════════════════════════════════════════════════════

/// Упорядоченный набор issues из одного буфера.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueBatch {
    issues: Vec<Issue>,
}

impl IssueBatch {
    /// Декодировать JSON-массив за один проход. Ошибка структуры верхнего
    /// уровня или любого элемента отклоняет весь буфер. `null` вместо
    /// массива даёт пустой батч.
    pub fn decode(raw: &[u8]) -> Result<Self, PublishError> {
        let issues: Option<Vec<Issue>> = serde_json::from_slice(raw).map_err(PublishError::Decode)?;
        Ok(Self { issues: issues.unwrap_or_default() })
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }
}

impl<'a> IntoIterator for &'a IssueBatch {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ignores_extra_fields_and_keeps_order() {
        let raw = br#"[
            {"id": 2, "title": "b", "state": "open", "body": "y", "url": "https://x", "labels": []},
            {"id": 1, "title": "a", "state": "closed", "body": "x", "user": {"login": "z"}}
        ]"#;
        let batch = IssueBatch::decode(raw).unwrap();
        let ids: Vec<i64> = batch.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(batch.iter().nth(1).unwrap().state, "closed");
    }

    #[test]
    fn null_body_decodes_as_empty() {
        let raw = br#"[{"id": 7, "title": "t", "state": "open", "body": null}]"#;
        let batch = IssueBatch::decode(raw).unwrap();
        assert_eq!(batch.iter().next().unwrap().body, "");
    }

    #[test]
    fn large_ids_fit() {
        let raw = br#"[{"id": 3000000000, "title": "", "state": "open", "body": ""}]"#;
        let batch = IssueBatch::decode(raw).unwrap();
        assert_eq!(batch.iter().next().unwrap().id, 3_000_000_000);
    }

    #[test]
    fn top_level_object_is_rejected() {
        let err = IssueBatch::decode(br#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, PublishError::Decode(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_or_null_id_is_zero() {
        let raw = br#"[
            {"title": "a", "state": "open", "body": "x"},
            {"id": null, "title": "b", "state": "open", "body": "y"}
        ]"#;
        let batch = IssueBatch::decode(raw).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|i| i.id == 0));
        assert_eq!(batch.iter().nth(1).unwrap().title, "b");
    }

    #[test]
    fn top_level_null_is_empty_batch() {
        let batch = IssueBatch::decode(b"null").unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn non_integer_id_is_rejected() {
        let err = IssueBatch::decode(br#"[{"id": "seven"}]"#).unwrap_err();
        assert!(matches!(err, PublishError::Decode(_)));
    }

    #[test]
    fn encode_emits_only_the_four_fields() {
        let issue = Issue {
            id: 1,
            title: "a".into(),
            state: "open".into(),
            body: "x".into(),
        };
        let payload = issue.encode().unwrap();
        assert_eq!(
            std::str::from_utf8(&payload).unwrap(),
            r#"{"id":1,"title":"a","state":"open","body":"x"}"#
        );
    }
}
