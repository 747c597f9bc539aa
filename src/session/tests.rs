use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use super::*;
use crate::convert::{ComrakConverter, MarkdownConverter};
use crate::typography::{FontColor, FontFamily, FontSize};

/// Deterministic stand-in for the markdown collaborator.
fn fake_convert(source: &str) -> String {
    format!("<p>{source}</p>")
}

/// Resolve every queued request in issue order.
fn settle(session: &mut Session) {
    for req in session.take_requests() {
        let markup = fake_convert(&req.source);
        session.resolve(PreviewCompletion::new(req.seq, Ok(markup)));
    }
}

fn settled_session() -> Session {
    let mut session = Session::new();
    settle(&mut session);
    session
}

fn size(px: u8) -> FontSize {
    FontSize::from_px(px).unwrap()
}

#[test]
fn test_new_session_defaults() {
    let session = Session::new();
    assert_eq!(session.content(), "");
    assert_eq!(session.typography(), Typography::default());
    assert_eq!(session.view_mode(), ViewMode::Editing);
    assert_eq!(session.preview_markup(), "");
}

#[test]
fn test_construction_requests_initial_preview() {
    let mut session = Session::with_initial("# hi", Typography::default());
    assert_eq!(session.preview_state(), PreviewState::Recomputing);
    let requests = session.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source, "# hi");
}

#[test]
fn test_default_session_queues_nothing() {
    let mut session = Session::default();
    assert_eq!(session.preview_state(), PreviewState::Idle);
    assert_eq!(session.requests_issued(), 0);
    assert!(session.take_requests().is_empty());
}

#[test]
fn test_empty_content_previews_as_empty_container() {
    let mut session = Session::new();
    let converter = ComrakConverter::new();
    for req in session.take_requests() {
        let result = converter.convert(&req.source);
        session.resolve(PreviewCompletion::new(req.seq, result));
    }
    assert_eq!(session.preview_markup(), "");

    session.toggle_view_mode();
    let Surface::Preview(surface) = session.surface() else {
        panic!("expected preview surface");
    };
    assert_eq!(surface.markup, "");
    assert_eq!(
        surface.to_html(),
        "<div style=\"font-family: Arial; font-size: 16px !important; color: black; white-space: pre-line;\"></div>"
    );
}

#[test]
fn test_edit_content_replaces_and_requests_preview() {
    let mut session = settled_session();
    session.edit_content("hello");
    assert_eq!(session.content(), "hello");
    let requests = session.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source, "hello");
}

#[test]
fn test_edit_content_with_same_text_is_not_a_change() {
    let mut session = settled_session();
    session.edit_content("same");
    settle(&mut session);
    let before = session.requests_issued();
    session.edit_content("same");
    assert_eq!(session.requests_issued(), before);
    assert!(session.take_requests().is_empty());
    assert_eq!(session.preview_state(), PreviewState::Idle);
}

#[test]
fn test_append_bold_twice() {
    let mut session = settled_session();
    session.append_markup(MarkupFragment::Bold);
    session.append_markup(MarkupFragment::Bold);
    assert_eq!(session.content(), "<b>Bold text</b><b>Bold text</b>");
    assert_eq!(session.take_requests().len(), 2);
}

#[test]
fn test_append_italic_after_text() {
    let mut session = settled_session();
    session.edit_content("start ");
    session.append_markup(MarkupFragment::Italic);
    assert_eq!(session.content(), "start <i>Italic text</i>");
}

#[test]
fn test_font_color_never_requests_conversion() {
    let mut session = settled_session();
    let before = session.requests_issued();
    for color in FontColor::ALL {
        session.set_font_color(color);
    }
    assert_eq!(session.typography().color, FontColor::Green);
    assert_eq!(session.requests_issued(), before);
    assert!(session.take_requests().is_empty());
    assert_eq!(session.preview_state(), PreviewState::Idle);
}

#[test]
fn test_font_family_change_requests_exactly_one_conversion() {
    let mut session = settled_session();
    let before = session.requests_issued();
    session.set_font_family(FontFamily::Verdana);
    assert_eq!(session.requests_issued(), before + 1);
    session.set_font_family(FontFamily::Verdana);
    assert_eq!(session.requests_issued(), before + 1);
    session.set_font_family(FontFamily::CourierNew);
    assert_eq!(session.requests_issued(), before + 2);
    assert_eq!(session.take_requests().len(), 2);
}

#[test]
fn test_font_size_change_requests_exactly_one_conversion() {
    let mut session = settled_session();
    let before = session.requests_issued();
    session.set_font_size(size(10));
    assert_eq!(session.requests_issued(), before + 1);
    session.set_font_size(size(10));
    assert_eq!(session.requests_issued(), before + 1);
    assert_eq!(session.typography().size, size(10));
}

#[test]
fn test_typography_changes_leave_content_alone() {
    let mut session = settled_session();
    session.edit_content("text");
    session.set_font_family(FontFamily::Helvetica);
    session.set_font_size(size(6));
    session.set_font_color(FontColor::Red);
    assert_eq!(session.content(), "text");
}

#[test]
fn test_toggle_twice_restores_mode_and_touches_nothing_else() {
    let mut session = settled_session();
    session.edit_content("abc");
    settle(&mut session);
    let markup = session.preview_markup().to_string();
    let typography = session.typography();
    let issued = session.requests_issued();

    session.toggle_view_mode();
    assert_eq!(session.view_mode(), ViewMode::Previewing);
    session.toggle_view_mode();
    assert_eq!(session.view_mode(), ViewMode::Editing);

    assert_eq!(session.content(), "abc");
    assert_eq!(session.preview_markup(), markup);
    assert_eq!(session.typography(), typography);
    assert_eq!(session.requests_issued(), issued);
}

#[test]
fn test_submit_invokes_callback_once_with_content() {
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&saved);
    let mut session = Session::new().with_on_save(move |content| {
        sink.borrow_mut().push(content.to_string());
    });
    session.edit_content("hello");
    session.submit();
    assert_eq!(*saved.borrow(), vec!["hello".to_string()]);
}

#[test]
fn test_submit_mutates_nothing() {
    let mut session = settled_session();
    session.edit_content("keep me");
    settle(&mut session);
    session.set_font_color(FontColor::Blue);
    session.toggle_view_mode();
    let issued = session.requests_issued();

    session.submit();

    assert_eq!(session.content(), "keep me");
    assert_eq!(session.preview_markup(), fake_convert("keep me"));
    assert_eq!(session.view_mode(), ViewMode::Previewing);
    assert_eq!(session.typography().color, FontColor::Blue);
    assert_eq!(session.requests_issued(), issued);
}

#[test]
fn test_submit_without_callback_is_noop() {
    let mut session = Session::new();
    session.edit_content("x");
    session.submit();
    assert_eq!(session.content(), "x");
}

#[test]
fn test_out_of_order_resolution_keeps_latest() {
    let mut session = settled_session();
    session.edit_content("a");
    session.edit_content("ab");
    let requests = session.take_requests();
    assert_eq!(requests.len(), 2);
    let (a, ab) = (&requests[0], &requests[1]);

    let r_ab = session.resolve(PreviewCompletion::new(ab.seq, Ok(fake_convert(&ab.source))));
    let r_a = session.resolve(PreviewCompletion::new(a.seq, Ok(fake_convert(&a.source))));

    assert_eq!(r_ab, Resolution::Applied);
    assert_eq!(r_a, Resolution::Stale);
    assert_eq!(session.preview_markup(), fake_convert("ab"));
}

#[test]
fn test_in_order_resolution_keeps_latest() {
    let mut session = settled_session();
    session.edit_content("a");
    session.edit_content("ab");
    settle(&mut session);
    assert_eq!(session.preview_markup(), fake_convert("ab"));
    assert_eq!(session.preview_state(), PreviewState::Idle);
}

#[test]
fn test_failed_conversion_keeps_previous_preview() {
    let mut session = settled_session();
    session.edit_content("good");
    settle(&mut session);

    session.edit_content("bad");
    let req = session.take_requests().remove(0);
    let res = session.resolve(PreviewCompletion::new(
        req.seq,
        Err(ConvertError::Failed("renderer down".to_string())),
    ));

    assert!(matches!(res, Resolution::Failed(_)));
    assert_eq!(session.preview_markup(), fake_convert("good"));
    assert!(session.last_preview_error().is_some());
    assert_eq!(session.preview_state(), PreviewState::Idle);

    // Later edits still get fresh attempts.
    session.edit_content("good again");
    settle(&mut session);
    assert_eq!(session.preview_markup(), fake_convert("good again"));
    assert!(session.last_preview_error().is_none());
}

#[test]
fn test_surface_follows_view_mode() {
    let mut session = settled_session();
    session.edit_content("body");
    settle(&mut session);
    assert_eq!(session.surface(), Surface::Edit("body"));

    session.set_font_color(FontColor::Red);
    session.toggle_view_mode();
    match session.surface() {
        Surface::Preview(surface) => {
            assert_eq!(surface.markup, fake_convert("body"));
            assert_eq!(surface.typography.color, FontColor::Red);
            assert!(surface.to_html().contains("color: red;"));
        }
        Surface::Edit(_) => panic!("expected preview surface"),
    }
}

#[derive(Debug, Clone)]
enum Op {
    Edit(String),
    Append(MarkupFragment),
    Family(FontFamily),
    Size(FontSize),
    Color(FontColor),
    Toggle,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => "[a-z #*]{0,8}".prop_map(Op::Edit),
        1 => prop_oneof![Just(MarkupFragment::Bold), Just(MarkupFragment::Italic)].prop_map(Op::Append),
        1 => (0..FontFamily::ALL.len()).prop_map(|i| Op::Family(FontFamily::ALL[i])),
        1 => (0..FontSize::ALL.len()).prop_map(|i| Op::Size(FontSize::ALL[i])),
        1 => (0..FontColor::ALL.len()).prop_map(|i| Op::Color(FontColor::ALL[i])),
        1 => Just(Op::Toggle),
    ]
}

fn apply(session: &mut Session, op: &Op) {
    match op {
        Op::Edit(text) => session.edit_content(text.clone()),
        Op::Append(fragment) => session.append_markup(*fragment),
        Op::Family(family) => session.set_font_family(*family),
        Op::Size(size) => session.set_font_size(*size),
        Op::Color(color) => session.set_font_color(*color),
        Op::Toggle => session.toggle_view_mode(),
    }
}

proptest! {
    /// Whatever order conversions finish in, and however user operations are
    /// interleaved with them, the preview settles on the newest content.
    #[test]
    fn prop_preview_settles_on_latest_content(
        ops in prop::collection::vec(op_strategy(), 1..24),
        resolve_after in prop::collection::vec(any::<bool>(), 24),
        order in any::<prop::sample::Index>(),
        reverse in any::<bool>(),
    ) {
        let mut session = Session::new();
        let mut pending: Vec<PreviewRequest> = Vec::new();

        for (i, op) in ops.iter().enumerate() {
            apply(&mut session, op);
            pending.extend(session.take_requests());
            // Occasionally resolve one arbitrary outstanding request mid-stream.
            if resolve_after[i] && !pending.is_empty() {
                let req = pending.remove(order.index(pending.len()));
                session.resolve(PreviewCompletion::new(req.seq, Ok(fake_convert(&req.source))));
            }
        }

        if reverse {
            pending.reverse();
        }
        for req in pending {
            session.resolve(PreviewCompletion::new(req.seq, Ok(fake_convert(&req.source))));
        }

        prop_assert_eq!(session.preview_state(), PreviewState::Idle);
        prop_assert_eq!(session.preview_markup(), fake_convert(session.content()));
    }

    #[test]
    fn prop_color_and_toggle_never_issue_requests(
        colors in prop::collection::vec(0..FontColor::ALL.len(), 0..16),
        toggles in 0usize..8,
    ) {
        let mut session = Session::new();
        session.take_requests();
        let before = session.requests_issued();
        for i in colors {
            session.set_font_color(FontColor::ALL[i]);
        }
        for _ in 0..toggles {
            session.toggle_view_mode();
        }
        prop_assert_eq!(session.requests_issued(), before);
        prop_assert!(session.take_requests().is_empty());
    }
}
