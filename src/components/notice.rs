use gloo_timers::callback::Timeout;
use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    fn class(&self) -> &'static str {
        match self {
            NoticeKind::Info => "notice-info",
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        }
    }
}

/// A banner message owned by a form; `None` hides it.
#[derive(Clone, Debug, PartialEq)]
pub struct NoticeMessage {
    pub kind: NoticeKind,
    pub text: String,
    pub auto_dismiss_ms: Option<u32>,
}

impl NoticeMessage {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into(), auto_dismiss_ms: None }
    }

    pub fn dismiss_after(mut self, ms: u32) -> Self {
        self.auto_dismiss_ms = Some(ms);
        self
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: NoticeMessage,
    pub on_dismiss: Callback<()>,
}

#[function_component]
pub fn Notice(props: &NoticeProps) -> Html {
    let NoticeProps { message, on_dismiss } = props;

    {
        let on_dismiss = on_dismiss.clone();
        use_effect_with_deps(
            move |message: &NoticeMessage| {
                let timeout = message
                    .auto_dismiss_ms
                    .map(|ms| Timeout::new(ms, move || on_dismiss.emit(())));
                move || drop(timeout)
            },
            message.clone(),
        );
    }

    let close = {
        let on_dismiss = on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class={classes!("form-notice", message.kind.class())} role="status">
            <span class="notice-text">{ &message.text }</span>
            <button type="button" class="notice-close" aria-label="Dismiss" onclick={close}>{ "×" }</button>
        </div>
    }
}
