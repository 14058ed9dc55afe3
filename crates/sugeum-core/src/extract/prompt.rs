//! Prompt construction for the extraction provider.

use chrono::NaiveDate;

use super::rules::ISO_FORMAT;

/// System message for every extraction request.
pub const SYSTEM_PROMPT: &str = "건설현장 수금 관리 데이터 분석 AI. 반드시 JSON 객체 하나만 반환한다.";

/// Build the user message: instructions, the target schema, and the note.
pub fn build_prompt(text: &str, today: NaiveDate) -> String {
    let note = text.replace('"', "'");
    format!(
        r#"건설현장 수금 관리 시스템입니다.
아래 메모를 분석해서 JSON 객체로 변환하세요.

오늘 날짜: {today}
메모: "{note}"

반환 형식:
{{
    "site_name": "현장명 또는 거래처명",
    "work_type": "작업 종류",
    "amount": "금액 (원 단위 숫자만)",
    "payment_type": "계약금|중도금|잔금|자재비|인건비|기타",
    "expected_date": "받을 날짜 (YYYY-MM-DD)",
    "payment_method": "현금|계좌이체|카드|미정",
    "memo": "추가 메모사항"
}}

분석 규칙:
1. site_name: "북구청", "강남 아파트", "김사장" 같은 거래처/현장명
2. work_type: "방수", "타일", "미장", "조적", "인테리어" 등
3. amount: 원 단위 숫자만 (예: "1000만원" → "10000000", "2억 3천만원" → "230000000")
4. payment_type: 위 목록 중 하나. 해당 없으면 "기타"
5. expected_date: 오늘 날짜 기준으로 "YYYY-MM-DD" 변환. "끝나면", "완료 후" 같은 조건이면 "작업 완료 후"
6. payment_method: 위 목록 중 하나. 언급 없으면 "미정"
7. 정보가 없으면 빈 문자열 "" (null 금지, 키 생략 금지)

반드시 유효한 JSON만 반환하세요."#,
        today = today.format(ISO_FORMAT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_note_and_schema() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let prompt = build_prompt("북구청 \"방수\" 1000만원", today);

        assert!(prompt.contains("메모: \"북구청 '방수' 1000만원\""));
        assert!(prompt.contains("오늘 날짜: 2025-01-20"));
        for key in ["site_name", "work_type", "amount", "payment_type", "expected_date", "payment_method", "memo"] {
            assert!(prompt.contains(&format!("\"{key}\"")), "{key}");
        }
        assert!(prompt.contains("null 금지"));
    }
}
