//! # 목록 조회 모델
//!
//! 목록 화면이 서버에 보내는 조회 조건과, 서버가 돌려주는 페이지 결과의 형태입니다.
//!
//! ## 흐름
//! ```text
//! ?page=2&size=10&q=접수&category=event&sort=hit
//!     → ListParams (원시 문자열, 알 수 없는 키는 따로 모음)
//!     → ListOptions + Page (검증된 값)
//!     → Paged<T> { rows, total }
//!     → PageEnvelope<T> { content, totalElements, totalPages, number, ... }
//! ```

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// 게시물 분류 (대회 / 행사 / 공지 / 일반)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Match,
    Event,
    Notice,
    General,
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "match" => Ok(Category::Match),
            "event" => Ok(Category::Event),
            "notice" => Ok(Category::Notice),
            "general" => Ok(Category::General),
            other => Err(AppError::BadRequest(format!("Unknown category: {other}"))),
        }
    }
}

/// 공개 여부. 행에 값이 없으면 공개로 간주합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Open,
    Closed,
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Visibility::Open),
            "closed" => Ok(Visibility::Closed),
            other => Err(AppError::BadRequest(format!("Unknown visibility: {other}"))),
        }
    }
}

/// 정렬 기준. 한 번의 조회에는 정확히 하나만 적용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// 최신순 (날짜 내림차순)
    #[default]
    New,
    /// 조회수순 (내림차순)
    Hit,
    /// 제목 가나다순
    Name,
}

impl SortOrder {
    /// 쿼리 파라미터의 정렬 값을 해석합니다.
    ///
    /// 오래된 링크나 예상치 못한 값 때문에 목록 화면이 깨지지 않도록
    /// 알 수 없는 값은 에러 대신 기본값(최신순)으로 처리합니다.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim() {
            "new" | "" => SortOrder::New,
            "hit" => SortOrder::Hit,
            "name" | "title" => SortOrder::Name,
            other => {
                tracing::debug!("Unknown sort key {:?}, falling back to \"new\"", other);
                SortOrder::New
            }
        }
    }
}

/// 문의 목록에서 답변 행을 다루는 방식
///
/// 데이터 모양으로 추측하지 않고, 호출 측이 항상 명시적으로 고릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadMode {
    /// 답변이 달린 질문 바로 뒤에 답변 행을 끼워 넣습니다.
    Expand,
    /// 저장소가 이미 답변 행을 펼쳐서 돌려줍니다. 확장 단계를 건너뜁니다.
    PreExpanded,
    /// 질문 행만 보여줍니다.
    Flat,
}

impl FromStr for ThreadMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "expand" => Ok(ThreadMode::Expand),
            "pre-expanded" => Ok(ThreadMode::PreExpanded),
            "flat" => Ok(ThreadMode::Flat),
            other => Err(AppError::BadRequest(format!("Unknown thread mode: {other}"))),
        }
    }
}

/// 검증이 끝난 목록 필터 옵션
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 검색어 (대소문자 무시 부분 일치). 공백뿐이면 필터하지 않습니다.
    pub q: Option<String>,
    /// 분류 필터 (정확히 일치)
    pub category: Option<Category>,
    /// 공개 여부 필터
    pub visibility: Option<Visibility>,
    pub sort: SortOrder,
}

/// 목록 API의 원시 쿼리 파라미터
///
/// 모든 값을 문자열로 받은 뒤 [`ListParams::options`], [`ListParams::page`]에서
/// 검증합니다. 알 수 없는 키는 `ignored`에 모아 로그만 남기고 무시합니다.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
    /// `category`의 옛 이름. 둘 다 오면 값이 같아야 합니다.
    pub kind: Option<String>,
    pub visibility: Option<String>,
    pub sort: Option<String>,
    /// 문의 목록 전용: `expand` | `pre-expanded` | `flat`
    pub threads: Option<String>,
    #[serde(flatten)]
    pub ignored: HashMap<String, String>,
}

impl ListParams {
    /// 필터 옵션을 만듭니다. 분류/공개 여부 값이 잘못되면 400 에러입니다.
    pub fn options(&self) -> Result<ListOptions, AppError> {
        if !self.ignored.is_empty() {
            let keys: Vec<&String> = self.ignored.keys().collect();
            tracing::debug!("Ignoring unrecognized list parameters: {:?}", keys);
        }

        let category = match (non_blank(&self.category), non_blank(&self.kind)) {
            (Some(category), Some(kind)) if category != kind => {
                return Err(AppError::BadRequest(format!(
                    "category ({category}) and kind ({kind}) disagree"
                )));
            }
            (category, kind) => category.or(kind),
        }
        .map(str::parse::<Category>)
        .transpose()?;
        let visibility = non_blank(&self.visibility)
            .map(str::parse::<Visibility>)
            .transpose()?;

        Ok(ListOptions {
            q: non_blank(&self.q).map(str::to_string),
            category,
            visibility,
            sort: self
                .sort
                .as_deref()
                .map(SortOrder::parse_lenient)
                .unwrap_or_default(),
        })
    }

    /// 페이지 번호/크기를 검증합니다. 값이 없으면 1페이지, `default_size`입니다.
    pub fn page(&self, default_size: u32) -> Result<Page, AppError> {
        let number = parse_number(&self.page, "page")?.unwrap_or(1);
        let size = parse_number(&self.size, "size")?.unwrap_or(i64::from(default_size));
        Page::new(number, size)
    }

    /// 스레드 모드. 파라미터가 없으면 `default`를 사용합니다.
    pub fn threads(&self, default: ThreadMode) -> Result<ThreadMode, AppError> {
        non_blank(&self.threads)
            .map(str::parse::<ThreadMode>)
            .transpose()
            .map(|mode| mode.unwrap_or(default))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(value: &Option<String>, name: &str) -> Result<Option<i64>, AppError> {
    non_blank(value)
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be an integer")))
        })
        .transpose()
}

/// 검증된 페이지 요청 (1부터 시작하는 번호, 0보다 큰 크기)
///
/// `Page::new`만이 값을 만들 수 있으므로 페이지네이터는 실패하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    pub fn new(number: i64, size: i64) -> Result<Self, AppError> {
        if number < 1 {
            return Err(AppError::BadRequest(format!(
                "page must be 1 or greater (got {number})"
            )));
        }
        if size < 1 {
            return Err(AppError::BadRequest(format!(
                "size must be 1 or greater (got {size})"
            )));
        }
        let number = u32::try_from(number)
            .map_err(|_| AppError::BadRequest("page is too large".to_string()))?;
        let size = u32::try_from(size)
            .map_err(|_| AppError::BadRequest("size is too large".to_string()))?;
        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 이 페이지 첫 행의 0 기반 위치
    pub fn offset(&self) -> usize {
        (self.number as usize - 1).saturating_mul(self.size as usize)
    }
}

/// 모든 목록 조회가 돌려주는 균일한 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub rows: Vec<T>,
    /// 페이지를 자르기 전, 필터가 적용된 전체 행 수
    pub total: usize,
}

impl<T> Paged<T> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
        }
    }
}

/// 원격 REST API의 페이지 봉투
///
/// `number`는 원격 API 규약대로 0부터 시작합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
    pub size: u64,
    #[serde(default)]
    pub number_of_elements: u64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

impl<T> PageEnvelope<T> {
    /// 조회 결과와 요청 페이지로 봉투를 만듭니다.
    pub fn from_paged(paged: Paged<T>, page: Page) -> Self {
        let size = u64::from(page.size());
        let total_elements = paged.total as u64;
        let total_pages = total_elements.div_ceil(size);
        let number = u64::from(page.number()) - 1;
        Self {
            number_of_elements: paged.rows.len() as u64,
            empty: paged.rows.is_empty(),
            content: paged.rows,
            total_elements,
            total_pages,
            number,
            size,
            first: number == 0,
            last: number + 1 >= total_pages,
        }
    }

    /// 본문 행만 변환합니다 (페이지 메타데이터는 유지).
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageEnvelope<U> {
        PageEnvelope {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

/// 목록 화면에 표시할 번호가 붙은 행
///
/// 고정(pinned) 공지나 답변 행처럼 번호가 없는 행은 `no`가 null입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Numbered<T> {
    pub no: Option<u64>,
    #[serde(flatten)]
    pub row: T,
}
