//! Scripted LLM for tests.


#[cfg(test)]
mod internal_tests {
    use super::tests::MockLlm;
    use crate::port::outbound::llm::Llm;

    #[tokio::test]
    async fn mock_llm_returns_response() {
        let llm = MockLlm::new(r#"{"likely_present": true, "confidence": 0.7}"#);
        let result = llm.complete("system", "prompt").await.unwrap();
        assert_eq!(result, r#"{"likely_present": true, "confidence": 0.7}"#);
        assert_eq!(llm.calls(), 1);
        assert_eq!(llm.last_prompt().as_deref(), Some("prompt"));
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        assert!(MockLlm::failing().complete("s", "p").await.is_err());
    }
}
