//! # 문의 스레드 확장
//!
//! 답변이 달린 질문 바로 뒤에 답변 행을 끼워 넣어, 목록 화면이
//! 질문/답변을 한 줄씩 그릴 수 있게 합니다.
//!
//! ```text
//! [Q1(답변 있음), Q2]  →  [Q1, RE: Q1, Q2]
//! ```

use crate::models::{Inquiry, InquiryAnswer, RowId};
use std::collections::HashMap;

/// 답변이 있는 질문마다 답변 행을 바로 뒤에 추가합니다.
///
/// 이미 확장된 목록을 다시 넣어도 결과가 같습니다.
/// 답변 행에는 `answer`가 없고, 질문 뒤에 자기 답변 행이 이미 있으면 건너뜁니다.
pub fn expand(rows: Vec<Inquiry>) -> Vec<Inquiry> {
    let mut out = Vec::with_capacity(rows.len() * 2);
    let mut iter = rows.into_iter().peekable();

    while let Some(row) = iter.next() {
        let already_expanded = iter
            .peek()
            .is_some_and(|next| next.reply_of == Some(row.id));

        let reply = match (&row.answer, already_expanded) {
            (Some(answer), false) if !row.is_reply() => Some(reply_row(&row, answer)),
            _ => None,
        };

        out.push(row);
        out.extend(reply);
    }

    out
}

/// 이미 펼쳐진 목록에서 답변 행을 떼어 내 부모 질문 ID별로 모읍니다.
///
/// 질문 목록과 각 질문의 답변 행 모두 입력 순서를 유지합니다.
pub fn detach_replies(rows: Vec<Inquiry>) -> (Vec<Inquiry>, HashMap<RowId, Vec<Inquiry>>) {
    let mut questions = Vec::with_capacity(rows.len());
    let mut replies: HashMap<RowId, Vec<Inquiry>> = HashMap::new();
    for row in rows {
        match row.reply_of {
            Some(parent) => replies.entry(parent).or_default().push(row),
            None => questions.push(row),
        }
    }
    (questions, replies)
}

/// 정렬된 질문마다 떼어 둔 답변 행을 바로 뒤에 다시 붙입니다.
///
/// 부모 질문이 목록에 없는 답변 행(필터에서 빠졌거나 원래 부모가 없는 행)은 버립니다.
pub fn reattach(questions: Vec<Inquiry>, mut replies: HashMap<RowId, Vec<Inquiry>>) -> Vec<Inquiry> {
    let mut out = Vec::with_capacity(questions.len() * 2);
    for question in questions {
        let own = replies.remove(&question.id);
        out.push(question);
        out.extend(own.into_iter().flatten());
    }
    if !replies.is_empty() {
        tracing::debug!(dropped = replies.len(), "Reply rows without a listed question");
    }
    out
}

fn reply_row(parent: &Inquiry, answer: &InquiryAnswer) -> Inquiry {
    Inquiry {
        id: parent.id,
        title: answer
            .title
            .clone()
            .unwrap_or_else(|| format!("RE: {}", parent.title)),
        author: answer.author.clone(),
        date: answer.date.clone(),
        views: 0,
        secret: parent.secret,
        answered: true,
        answer: None,
        reply_of: Some(parent.id),
        content: answer.content.clone(),
        files: answer.files.clone(),
    }
}
