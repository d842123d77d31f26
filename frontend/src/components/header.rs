use yew::prelude::*;

/// Top-level sections of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Receipts,
    Dashboard,
    Menu,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Receipts, Tab::Dashboard, Tab::Menu, Tab::Settings];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Receipts => "Receipts",
            Tab::Dashboard => "Dashboard",
            Tab::Menu => "Menu",
            Tab::Settings => "Settings",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub business_name: Option<String>,
    pub accent_color: String,
    pub active_tab: Tab,
    pub on_select_tab: Callback<Tab>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="header" style={format!("border-bottom: 3px solid {};", props.accent_color)}>
            <div class="container">
                <h1>
                    {match &props.business_name {
                        Some(name) if !name.trim().is_empty() => {
                            format!("{} — Receipt Studio", name.trim())
                        }
                        _ => "Receipt Studio".to_string(),
                    }}
                </h1>
                <nav class="header-tabs">
                    {for Tab::ALL.iter().map(|tab| {
                        let is_active = *tab == props.active_tab;
                        let on_select_tab = props.on_select_tab.clone();
                        let tab = *tab;
                        let onclick = Callback::from(move |_| on_select_tab.emit(tab));
                        let style = if is_active {
                            format!("background: {}; color: white;", props.accent_color)
                        } else {
                            String::new()
                        };

                        html! {
                            <button
                                class={if is_active { "tab-button active" } else { "tab-button" }}
                                {style}
                                {onclick}
                            >
                                {tab.label()}
                            </button>
                        }
                    })}
                </nav>
            </div>
        </header>
    }
}
