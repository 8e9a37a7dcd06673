use super::*;

#[test]
fn blank_board_ids_are_rejected() {
    for id in ["", "   ", "\t"] {
        let err = CardRequest::new(id).unwrap_err();
        assert!(matches!(err, GreetcardError::Validation(_)), "{id:?}");
    }
    assert_eq!(CardRequest::new("x").unwrap().board_id(), "x");
}

#[test]
fn failed_state_carries_localized_message() {
    let state = GenerationState::failed("x", &GreetcardError::encoding("too long"));
    let GenerationState::Failed {
        board_id,
        reason,
        message,
    } = &state
    else {
        panic!("expected Failed");
    };
    assert_eq!(board_id, "x");
    assert_eq!(reason, "encoding error: too long");
    assert_eq!(*message, "خطا در ساخت کارت تبریک. لطفاً دوباره تلاش کنید.");
    assert_eq!(state.label(), "failed");
    assert!(state.result().is_none());
}

#[test]
fn default_state_is_idle() {
    assert_eq!(GenerationState::default(), GenerationState::Idle);
    assert!(!GenerationState::Idle.is_loading());
}
