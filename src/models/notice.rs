use super::{Category, Record, RowId, Visibility};
use serde::{Deserialize, Serialize};

/// 첨부 파일 참조 (업로드 자체는 다루지 않음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(default)]
    pub id: RowId,
    pub category: Category,
    pub title: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// 목록 상단 고정 여부 (번호 없이 표시)
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

impl Record for Notice {
    const DOMAIN: &'static str = "notices";

    fn id(&self) -> RowId {
        self.id
    }

    fn set_id(&mut self, id: RowId) {
        self.id = id;
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn views(&self) -> u64 {
        self.views
    }

    fn touch(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    fn category(&self) -> Option<Category> {
        Some(self.category)
    }

    fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    fn pinned(&self) -> bool {
        self.pinned
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author.as_str()]
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateNoticeRequest {
    pub category: Category,
    pub title: String,
    pub author: String,
    pub content: String,
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

impl CreateNoticeRequest {
    /// 저장할 공지 행을 만듭니다. ID는 저장소가 부여합니다.
    pub fn into_notice(self, date: String) -> Notice {
        Notice {
            id: RowId::default(),
            category: self.category,
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            date,
            views: 0,
            visibility: self.visibility,
            pinned: self.pinned,
            content: self.content,
            files: self.files,
        }
    }
}

/// 공지 부분 수정 요청 (None인 필드는 변경하지 않음)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoticeRequest {
    pub category: Option<Category>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// None = 필드 누락 (변경 안 함), Some(None) = null (공개 여부 해제), Some(Some(v)) = 지정
    #[serde(default, deserialize_with = "double_option")]
    pub visibility: Option<Option<Visibility>>,
    pub pinned: Option<bool>,
    pub files: Option<Vec<Attachment>>,
}

impl UpdateNoticeRequest {
    pub fn apply(self, notice: &mut Notice) {
        if let Some(category) = self.category {
            notice.category = category;
        }
        if let Some(title) = self.title {
            notice.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            notice.content = content;
        }
        if let Some(visibility) = self.visibility {
            notice.visibility = visibility;
        }
        if let Some(pinned) = self.pinned {
            notice.pinned = pinned;
        }
        if let Some(files) = self.files {
            notice.files = files;
        }
    }
}

/// `null`과 "필드 없음"을 구분하기 위한 역직렬화 헬퍼
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_distinguishes_null_from_missing() {
        let mut notice = CreateNoticeRequest {
            category: Category::Notice,
            title: "접수 안내".to_string(),
            author: "관리자".to_string(),
            content: "본문".to_string(),
            visibility: Some(Visibility::Closed),
            pinned: false,
            files: Vec::new(),
        }
        .into_notice("2025-08-01".to_string());

        let untouched: UpdateNoticeRequest =
            serde_json::from_str(r#"{ "title": " 새 제목 " }"#).unwrap();
        untouched.apply(&mut notice);
        assert_eq!(notice.title, "새 제목");
        assert_eq!(notice.visibility, Some(Visibility::Closed));

        let cleared: UpdateNoticeRequest =
            serde_json::from_str(r#"{ "visibility": null }"#).unwrap();
        cleared.apply(&mut notice);
        assert_eq!(notice.visibility, None);
    }
}
