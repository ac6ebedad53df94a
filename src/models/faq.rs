use super::notice::double_option;
use super::{Category, Record, RowId, Visibility};
use serde::{Deserialize, Serialize};

/// 자주 묻는 질문. `title`이 질문, `content`가 답변 본문입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(default)]
    pub id: RowId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub title: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub content: String,
}

impl Record for Faq {
    const DOMAIN: &'static str = "faqs";

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
        self.category
    }

    fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author.as_str(), self.content.as_str()]
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFaqRequest {
    pub category: Option<Category>,
    pub title: String,
    pub author: String,
    pub content: String,
    pub visibility: Option<Visibility>,
}

impl CreateFaqRequest {
    pub fn into_faq(self, date: String) -> Faq {
        Faq {
            id: RowId::default(),
            category: self.category,
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            date,
            views: 0,
            visibility: self.visibility,
            content: self.content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFaqRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<Category>>,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub visibility: Option<Option<Visibility>>,
}

impl UpdateFaqRequest {
    pub fn apply(self, faq: &mut Faq) {
        if let Some(category) = self.category {
            faq.category = category;
        }
        if let Some(title) = self.title {
            faq.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            faq.content = content;
        }
        if let Some(visibility) = self.visibility {
            faq.visibility = visibility;
        }
    }
}
