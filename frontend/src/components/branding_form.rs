use shared::TemplateVariant;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_profile::{ProfileField, ProfileFormState};

#[derive(Properties, PartialEq)]
pub struct BrandingFormProps {
    pub form: ProfileFormState,
    pub on_edit: Callback<(ProfileField, String)>,
    pub on_toggle_logo: Callback<bool>,
    pub on_set_template: Callback<TemplateVariant>,
    pub on_save: Callback<()>,
}

fn text_input(
    props: &BrandingFormProps,
    field: ProfileField,
    label: &str,
    placeholder: &str,
    value: String,
    input_type: &str,
) -> Html {
    let on_edit = props.on_edit.clone();
    let onchange = Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_edit.emit((field, input.value()));
    });

    html! {
        <div class="form-group">
            <label>{label}</label>
            <input
                type={input_type.to_string()}
                placeholder={placeholder.to_string()}
                {value}
                {onchange}
                disabled={props.form.saving}
            />
        </div>
    }
}

#[function_component(BrandingForm)]
pub fn branding_form(props: &BrandingFormProps) -> Html {
    let form = &props.form;

    let on_logo_toggle = {
        let on_toggle_logo = props.on_toggle_logo.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_toggle_logo.emit(input.checked());
        })
    };

    let on_template_change = {
        let on_set_template = props.on_set_template.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_set_template.emit(TemplateVariant::from_value(Some(&select.value())));
        })
    };

    let on_submit = {
        let on_save = props.on_save.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_save.emit(());
        })
    };

    html! {
        <section class="branding-section">
            <h2>{"Business & Branding"}</h2>

            {if let Some(error) = form.form_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if let Some(success) = form.form_success.as_ref() {
                html! { <div class="form-message success">{success}</div> }
            } else { html! {} }}

            <form class="branding-form" onsubmit={on_submit}>
                <div class="form-row">
                    {text_input(props, ProfileField::BusinessName, "Business name",
                        "Mama K Kitchen", form.business_name.clone(), "text")}
                    {text_input(props, ProfileField::Phone, "Phone",
                        "0801 234 5678", form.phone.clone(), "text")}
                </div>
                <div class="form-row">
                    {text_input(props, ProfileField::Tagline, "Tagline",
                        "Good food, fast", form.tagline.clone(), "text")}
                    {text_input(props, ProfileField::FooterMessage, "Receipt footer",
                        "Thank you for your patronage!", form.footer_message.clone(), "text")}
                </div>
                <div class="form-row">
                    {text_input(props, ProfileField::Slug, "Menu address",
                        "Generated from the business name when left empty",
                        form.slug.clone(), "text")}
                    {text_input(props, ProfileField::Currency, "Currency",
                        "₦ (NGN)", form.currency.clone(), "text")}
                </div>
                <div class="form-row">
                    {text_input(props, ProfileField::AccentColor, "Accent color",
                        "#0f766e", form.accent_color.clone(), "color")}
                    {text_input(props, ProfileField::LogoUrl, "Logo URL",
                        "https://...", form.logo_url.clone(), "text")}
                </div>
                <div class="form-row">
                    <div class="form-group checkbox-group">
                        <label>
                            <input
                                type="checkbox"
                                checked={form.show_logo}
                                onchange={on_logo_toggle}
                                disabled={form.saving}
                            />
                            {" Show logo on receipts"}
                        </label>
                    </div>
                    <div class="form-group">
                        <label>{"Receipt template"}</label>
                        <select onchange={on_template_change} disabled={form.saving}>
                            {for [TemplateVariant::Simple, TemplateVariant::Detailed]
                                .iter()
                                .map(|variant| html! {
                                    <option
                                        value={variant.as_str()}
                                        selected={*variant == form.template_variant}
                                    >
                                        {variant.as_str()}
                                    </option>
                                })}
                        </select>
                    </div>
                </div>

                <button type="submit" class="btn btn-primary" disabled={form.saving}>
                    {if form.saving { "Saving..." } else { "Save Profile" }}
                </button>
            </form>
        </section>
    }
}
