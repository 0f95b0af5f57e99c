use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::forms::schema::{FieldKind, FormField, SelectOption};

#[derive(Properties, PartialEq)]
pub struct FieldViewProps {
    pub field: FormField,
    pub id: String,
    pub value: String,
    #[prop_or_default]
    pub options: Vec<SelectOption>,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or_default]
    pub required: bool,
    #[prop_or_default]
    pub status: Option<&'static str>,
    #[prop_or_default]
    pub error: Option<String>,
    /// (field name, new value)
    pub on_change: Callback<(String, String)>,
    pub on_blur: Callback<String>,
}

/// Focuses a rendered field by its element id.
pub fn focus_field(id: &str) {
    if let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    {
        let _ = element.focus();
    }
}

/// One labelled form control plus its validation message.
#[function_component]
pub fn FieldView(props: &FieldViewProps) -> Html {
    let FieldViewProps { field, id, value, options, disabled, required, status, error, on_change, on_blur } = props;

    let name = field.name.clone();
    let emit_value = {
        let on_change = on_change.clone();
        let name = name.clone();
        move |value: String| on_change.emit((name.clone(), value))
    };

    let oninput = {
        let emit_value = emit_value.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            emit_value(input.value());
        })
    };

    let onchange = {
        let emit_value = emit_value.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            emit_value(input.value());
        })
    };

    let onblur = {
        let on_blur = on_blur.clone();
        let name = name.clone();
        Callback::from(move |_: FocusEvent| on_blur.emit(name.clone()))
    };

    let control_class = classes!("form-control", *status);
    let label = html! {
        <label for={id.clone()}>
            { &field.label }
            if *required { <span class="required">{ " *" }</span> }
        </label>
    };

    let control = match &field.kind {
        FieldKind::Text | FieldKind::Tel | FieldKind::Email | FieldKind::Date { .. } => {
            let (input_type, min) = match &field.kind {
                FieldKind::Tel => ("tel", None),
                FieldKind::Email => ("email", None),
                FieldKind::Date { min } => ("date", Some(min.clone())),
                _ => ("text", None),
            };
            html! {
                <input
                    type={input_type}
                    id={id.clone()}
                    name={name.clone()}
                    class={control_class}
                    placeholder={field.placeholder.clone()}
                    value={value.clone()}
                    {min}
                    {oninput}
                    {onblur}
                />
            }
        }
        FieldKind::Select { placeholder, .. } | FieldKind::DependentSelect { placeholder, .. } => {
            let placeholder = match &field.kind {
                FieldKind::DependentSelect { waiting, .. } if *disabled => waiting,
                _ => placeholder,
            };
            let onchange = {
                let emit_value = emit_value.clone();
                Callback::from(move |e: Event| {
                    let select: HtmlSelectElement = e.target_unchecked_into();
                    emit_value(select.value());
                })
            };
            html! {
                <select
                    id={id.clone()}
                    name={name.clone()}
                    class={control_class}
                    disabled={*disabled}
                    {onchange}
                    {onblur}
                >
                    <option value="" selected={value.is_empty()}>{ placeholder }</option>
                    { for options.iter().map(|opt| html! {
                        <option value={opt.value.clone()} selected={&opt.value == value}>{ &opt.label }</option>
                    }) }
                </select>
            }
        }
        FieldKind::Textarea { rows } => {
            let oninput = {
                let emit_value = emit_value.clone();
                Callback::from(move |e: InputEvent| {
                    let textarea: HtmlTextAreaElement = e.target_unchecked_into();
                    emit_value(textarea.value());
                })
            };
            html! {
                <textarea
                    id={id.clone()}
                    name={name.clone()}
                    class={control_class}
                    rows={rows.to_string()}
                    placeholder={field.placeholder.clone()}
                    value={value.clone()}
                    {oninput}
                    {onblur}
                />
            }
        }
        FieldKind::Checkbox { description } => {
            let checked = matches!(value.as_str(), "on" | "true" | "1");
            let onchange = {
                let emit_value = emit_value.clone();
                Callback::from(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    emit_value(if input.checked() { "on".to_string() } else { String::new() });
                })
            };
            return html! {
                <div class={classes!("form-group", "checkbox-group", field.full_width.then(|| "full-width"))}>
                    <label class="checkbox-label" for={id.clone()}>
                        <input type="checkbox" id={id.clone()} name={name} {checked} {onchange} />
                        <span class="checkbox-title">{ &field.label }</span>
                    </label>
                    <small class="checkbox-description">{ description }</small>
                </div>
            };
        }
        FieldKind::Radio { options } => html! {
            <div class={classes!("radio-group", *status)} id={id.clone()}>
                { for options.iter().map(|opt| {
                    let option_id = format!("{}-{}", id, opt.value);
                    html! {
                        <label class="radio-option" for={option_id.clone()}>
                            <input
                                type="radio"
                                id={option_id}
                                name={name.clone()}
                                value={opt.value.clone()}
                                checked={&opt.value == value}
                                onchange={onchange.clone()}
                            />
                            <span>{ &opt.label }</span>
                        </label>
                    }
                }) }
            </div>
        },
    };

    html! {
        <div class={classes!("form-group", field.full_width.then(|| "full-width"))}>
            { label }
            { control }
            if let Some(error) = error {
                <div class="error-message">{ error }</div>
            }
        </div>
    }
}
