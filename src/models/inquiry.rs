//! # 문의(Inquiry) 모델
//!
//! 문의는 질문 행과, 선택적으로 붙는 답변(`answer`)으로 이루어집니다.
//! 목록에서는 답변이 질문 바로 아래의 별도 "답변 행"으로 펼쳐지며
//! (services::threads), 답변 행은 `reply_of`로 원래 질문을 가리킵니다.

use super::{Attachment, Record, RowId};
use serde::{Deserialize, Serialize};

/// 질문에 달린 관리자 답변
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

/// 문의 한 행 (질문 행 또는 합성된 답변 행)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(default)]
    pub id: RowId,
    pub title: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub views: u64,
    /// 비밀글: 상세 내용은 작성자/관리자만 볼 수 있음
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<InquiryAnswer>,
    /// 답변 행일 때 원래 질문의 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_of: Option<RowId>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

impl Inquiry {
    /// 합성된 답변 행인지 확인합니다.
    pub fn is_reply(&self) -> bool {
        self.reply_of.is_some()
    }

    /// 답변을 달거나 교체합니다. `answered` 플래그를 함께 맞춥니다.
    pub fn set_answer(&mut self, answer: InquiryAnswer) {
        self.answer = Some(answer);
        self.answered = true;
    }

    /// 답변을 제거합니다. 답변이 없었으면 false를 반환합니다.
    pub fn clear_answer(&mut self) -> bool {
        self.answered = false;
        self.answer.take().is_some()
    }

    /// 공개 목록용으로 비밀글의 본문을 가립니다.
    ///
    /// 제목/작성자/날짜는 목록에 그대로 보이고, 본문/첨부/답변 본문만 지웁니다.
    pub fn redacted(mut self) -> Self {
        if self.secret {
            self.content.clear();
            self.files.clear();
            if let Some(answer) = self.answer.as_mut() {
                answer.content.clear();
                answer.files.clear();
            }
        }
        self
    }
}

impl Record for Inquiry {
    const DOMAIN: &'static str = "inquiries";

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

    /// 답변 행은 번호 없이 질문 아래에 붙습니다.
    fn numbered(&self) -> bool {
        !self.is_reply()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author.as_str(), self.date.as_str()]
    }
}

/// 공개 문의 등록 요청
#[derive(Debug, Deserialize)]
pub struct CreateInquiryRequest {
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

impl CreateInquiryRequest {
    pub fn into_inquiry(self, date: String) -> Inquiry {
        Inquiry {
            id: RowId::default(),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            date,
            views: 0,
            secret: self.secret,
            answered: false,
            answer: None,
            reply_of: None,
            content: self.content,
            files: self.files,
        }
    }
}

/// 관리자 답변 등록/수정 요청
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub title: Option<String>,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

impl ReplyRequest {
    pub fn into_answer(self, date: String) -> InquiryAnswer {
        InquiryAnswer {
            title: self
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            content: self.content,
            author: self.author.trim().to_string(),
            date,
            files: self.files,
        }
    }
}
