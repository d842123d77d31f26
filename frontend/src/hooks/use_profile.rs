use shared::{
    BusinessProfile, PresentationSettings, TemplateVariant, UpdateProfileRequest,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::{ApiClient, Logger};
use crate::session::Session;

/// Which profile field an edit targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileField {
    BusinessName,
    Phone,
    Tagline,
    FooterMessage,
    Slug,
    AccentColor,
    LogoUrl,
    Currency,
}

/// Editable branding form state; mirrors the saved profile once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFormState {
    pub business_name: String,
    pub phone: String,
    pub tagline: String,
    pub footer_message: String,
    pub slug: String,
    pub accent_color: String,
    pub show_logo: bool,
    pub logo_url: String,
    pub template_variant: TemplateVariant,
    pub currency: String,
    pub saving: bool,
    pub form_error: Option<String>,
    pub form_success: Option<String>,
}

impl ProfileFormState {
    pub fn empty() -> Self {
        let defaults = PresentationSettings::default();
        Self {
            business_name: String::new(),
            phone: String::new(),
            tagline: String::new(),
            footer_message: String::new(),
            slug: String::new(),
            accent_color: defaults.accent_color,
            show_logo: defaults.show_logo,
            logo_url: String::new(),
            template_variant: defaults.template_variant,
            currency: defaults.currency,
            saving: false,
            form_error: None,
            form_success: None,
        }
    }

    pub fn from_profile(profile: &BusinessProfile) -> Self {
        Self {
            business_name: profile.business_name.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            tagline: profile.tagline.clone().unwrap_or_default(),
            footer_message: profile.footer_message.clone().unwrap_or_default(),
            slug: profile.slug.clone(),
            accent_color: profile.settings.accent_color.clone(),
            show_logo: profile.settings.show_logo,
            logo_url: profile.settings.logo_url.clone().unwrap_or_default(),
            template_variant: profile.settings.template_variant,
            currency: profile.settings.currency.clone(),
            saving: false,
            form_error: None,
            form_success: None,
        }
    }

    fn non_empty(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Presentation settings as currently edited, so the live preview
    /// reflects unsaved branding changes.
    pub fn settings(&self) -> PresentationSettings {
        PresentationSettings {
            accent_color: self.accent_color.clone(),
            show_logo: self.show_logo,
            logo_url: Self::non_empty(&self.logo_url),
            template_variant: self.template_variant,
            currency: self.currency.clone(),
        }
    }

    fn save_request(&self) -> UpdateProfileRequest {
        UpdateProfileRequest {
            business_name: self.business_name.trim().to_string(),
            phone: Self::non_empty(&self.phone),
            tagline: Self::non_empty(&self.tagline),
            footer_message: Self::non_empty(&self.footer_message),
            slug: Self::non_empty(&self.slug),
            settings: self.settings(),
        }
    }
}

pub struct UseProfileResult {
    pub profile: Option<BusinessProfile>,
    pub loading: bool,
    pub form: ProfileFormState,
    pub actions: UseProfileActions,
}

#[derive(Clone, PartialEq)]
pub struct UseProfileActions {
    pub reload: Callback<()>,
    pub save: Callback<()>,
    pub edit: Callback<(ProfileField, String)>,
    pub set_show_logo: Callback<bool>,
    pub set_template: Callback<TemplateVariant>,
}

#[hook]
pub fn use_profile(api_client: &ApiClient, session: &Session) -> UseProfileResult {
    let profile = use_state(|| Option::<BusinessProfile>::None);
    let loading = use_state(|| true);
    let form = use_state(ProfileFormState::empty);

    let reload = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let profile = profile.clone();
        let loading = loading.clone();
        let form = form.clone();

        Callback::from(move |_| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let profile = profile.clone();
            let loading = loading.clone();
            let form = form.clone();

            spawn_local(async move {
                loading.set(true);
                match api_client.get_profile(&vendor_id).await {
                    Ok(Some(loaded)) => {
                        form.set(ProfileFormState::from_profile(&loaded));
                        profile.set(Some(loaded));
                    }
                    Ok(None) => {
                        // First run: nothing saved yet, keep the defaults
                        profile.set(None);
                    }
                    Err(e) => {
                        Logger::error_with_component(
                            "use_profile",
                            &format!("Failed to fetch profile: {}", e),
                        );
                    }
                }
                loading.set(false);
            });
        })
    };

    let save = {
        let api_client = api_client.clone();
        let vendor_id = session.vendor_id.clone();
        let profile = profile.clone();
        let form = form.clone();

        Callback::from(move |_| {
            let api_client = api_client.clone();
            let vendor_id = vendor_id.clone();
            let profile = profile.clone();
            let form = form.clone();
            let request = form.save_request();

            spawn_local(async move {
                form.set(ProfileFormState {
                    saving: true,
                    form_error: None,
                    form_success: None,
                    ..(*form).clone()
                });

                match api_client.save_profile(&vendor_id, request).await {
                    Ok(response) => {
                        let mut next = ProfileFormState::from_profile(&response.profile);
                        next.form_success = Some(response.success_message);
                        profile.set(Some(response.profile));
                        form.set(next);

                        let form = form.clone();
                        spawn_local(async move {
                            gloo::timers::future::TimeoutFuture::new(3000).await;
                            form.set(ProfileFormState { form_success: None, ..(*form).clone() });
                        });
                    }
                    Err(e) => {
                        form.set(ProfileFormState {
                            saving: false,
                            form_error: Some(e),
                            ..(*form).clone()
                        });
                    }
                }
            });
        })
    };

    let edit = {
        let form = form.clone();
        Callback::from(move |(field, value): (ProfileField, String)| {
            let mut next = (*form).clone();
            match field {
                ProfileField::BusinessName => next.business_name = value,
                ProfileField::Phone => next.phone = value,
                ProfileField::Tagline => next.tagline = value,
                ProfileField::FooterMessage => next.footer_message = value,
                ProfileField::Slug => next.slug = value,
                ProfileField::AccentColor => next.accent_color = value,
                ProfileField::LogoUrl => next.logo_url = value,
                ProfileField::Currency => next.currency = value,
            }
            form.set(next);
        })
    };

    let set_show_logo = {
        let form = form.clone();
        Callback::from(move |show: bool| {
            form.set(ProfileFormState { show_logo: show, ..(*form).clone() });
        })
    };

    let set_template = {
        let form = form.clone();
        Callback::from(move |variant: TemplateVariant| {
            form.set(ProfileFormState { template_variant: variant, ..(*form).clone() });
        })
    };

    UseProfileResult {
        profile: (*profile).clone(),
        loading: *loading,
        form: (*form).clone(),
        actions: UseProfileActions {
            reload,
            save,
            edit,
            set_show_logo,
            set_template,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_form() {
        let profile = BusinessProfile {
            vendor_id: "vendor::1".to_string(),
            business_name: "Mama K Kitchen".to_string(),
            phone: Some("0801 234 5678".to_string()),
            tagline: None,
            footer_message: Some("Thank you!".to_string()),
            slug: "mama-k".to_string(),
            settings: PresentationSettings {
                accent_color: "#b45309".to_string(),
                show_logo: false,
                logo_url: Some("https://cdn.example.com/logo.png".to_string()),
                template_variant: TemplateVariant::Detailed,
                currency: "₦ (NGN)".to_string(),
            },
            created_at: "2026-08-01T10:00:00+01:00".to_string(),
            updated_at: "2026-08-01T10:00:00+01:00".to_string(),
        };

        let form = ProfileFormState::from_profile(&profile);
        assert_eq!(form.settings(), profile.settings);
        assert_eq!(form.tagline, "");
    }

    #[test]
    fn blank_logo_url_becomes_none() {
        let mut form = ProfileFormState::empty();
        form.logo_url = "   ".to_string();
        assert_eq!(form.settings().logo_url, None);
    }
}
