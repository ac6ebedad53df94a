//! # 목록 필터/정렬/페이지네이션
//!
//! 공지·문의·FAQ 목록이 공통으로 쓰는 순수 함수들입니다.
//! 입력을 빌려 받아 새 `Vec`을 돌려주며, 원본은 절대 수정하지 않습니다.
//!
//! 처리 순서는 항상 `필터 → 정렬(하나만) → (문의라면 스레드 확장) → 번호 매기기 → 페이지 자르기`입니다.

use crate::models::{ListOptions, Numbered, Page, Paged, Record, SortOrder, Visibility};
use crate::services::collation::compare_ko;

/// 필터를 적용한 뒤 정렬 기준 하나로 정렬합니다.
///
/// 모든 정렬은 안정 정렬(stable sort)이므로 날짜/조회수가 같은 행은
/// 입력 순서를 유지합니다. 고정(pinned) 행은 정렬 기준과 관계없이 맨 앞에 모입니다.
pub fn filter_and_sort<T: Record>(rows: &[T], options: &ListOptions) -> Vec<T> {
    let needle = options
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<T> = rows
        .iter()
        .filter(|row| match &needle {
            Some(needle) => row
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            None => true,
        })
        .filter(|row| match options.category {
            Some(category) => row.category() == Some(category),
            None => true,
        })
        .filter(|row| match options.visibility {
            // 값이 없는 행은 공개로 간주
            Some(Visibility::Open) => row.visibility() != Some(Visibility::Closed),
            Some(Visibility::Closed) => row.visibility() == Some(Visibility::Closed),
            None => true,
        })
        .cloned()
        .collect();

    match options.sort {
        SortOrder::New => matched.sort_by(|a, b| b.date().cmp(a.date())),
        SortOrder::Hit => matched.sort_by(|a, b| b.views().cmp(&a.views())),
        SortOrder::Name => matched.sort_by(|a, b| compare_ko(a.title(), b.title())),
    }
    matched.sort_by_key(|row| !row.pinned());

    matched
}

/// 정렬이 끝난 전체 목록에 화면 표시 번호를 매깁니다.
///
/// 번호를 받는 행의 수에서 1까지 거꾸로 셉니다. 고정 행과 답변 행은 `no`가 null이고
/// 번호를 소모하지 않습니다. 페이지를 자르기 전에 불러야 페이지가 바뀌어도 번호가 이어집니다.
pub fn number_rows<T: Record>(rows: Vec<T>) -> Vec<Numbered<T>> {
    let mut next = rows.iter().filter(|row| row.numbered()).count() as u64;
    rows.into_iter()
        .map(|row| {
            if row.numbered() {
                let no = next;
                next = next.saturating_sub(1);
                Numbered { no: Some(no), row }
            } else {
                Numbered { no: None, row }
            }
        })
        .collect()
}

/// 필터가 끝난 행들에서 한 페이지를 잘라냅니다.
///
/// `total`은 자르기 전 길이입니다. 범위를 벗어난 페이지는 빈 `rows`를 돌려줍니다.
pub fn paginate<T>(rows: Vec<T>, page: Page) -> Paged<T> {
    let total = rows.len();
    let start = page.offset().min(total);
    let rows = rows
        .into_iter()
        .skip(start)
        .take(page.size() as usize)
        .collect();
    Paged { rows, total }
}
