use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::{SalesBucket, SalesSummaryResponse};
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartRange {
    Daily,
    Monthly,
}

impl ChartRange {
    fn label(&self) -> &'static str {
        match self {
            ChartRange::Daily => "30 Days",
            ChartRange::Monthly => "12 Months",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SalesChartProps {
    pub summary: Option<SalesSummaryResponse>,
    pub loading: bool,
}

pub enum Msg {
    SetRange(ChartRange),
}

/// Paid/outstanding revenue over time, drawn with plotters onto a canvas
pub struct SalesChart {
    canvas_ref: NodeRef,
    selected_range: ChartRange,
}

const PAID_COLOR: RGBColor = RGBColor(15, 118, 110);
const PENDING_COLOR: RGBColor = RGBColor(234, 88, 12);

impl Component for SalesChart {
    type Message = Msg;
    type Properties = SalesChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            canvas_ref: NodeRef::default(),
            selected_range: ChartRange::Daily,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetRange(range) => {
                self.selected_range = range;
                self.draw_chart(ctx.props().summary.as_ref());
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().summary != old_props.summary {
            self.draw_chart(ctx.props().summary.as_ref());
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if ctx.props().summary.is_some() {
            self.draw_chart(ctx.props().summary.as_ref());
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let loading = ctx.props().loading;
        let has_data = ctx
            .props()
            .summary
            .as_ref()
            .map(|s| s.receipt_count > 0)
            .unwrap_or(false);

        html! {
            <div class="sales-chart-container">
                <div class="chart-title-header">
                    <h3 class="chart-title">{"Sales History"}</h3>
                    <div class="chart-legend">
                        <span class="legend-paid">{"● Paid"}</span>
                        <span class="legend-pending">{"● Outstanding"}</span>
                    </div>
                    <div class="chart-range-selector">
                        {for [ChartRange::Daily, ChartRange::Monthly].iter().map(|range| {
                            let is_active = *range == self.selected_range;
                            let range = *range;
                            let onclick = link.callback(move |_| Msg::SetRange(range));

                            html! {
                                <button
                                    class={if is_active { "range-button active" } else { "range-button" }}
                                    {onclick}
                                >
                                    {range.label()}
                                </button>
                            }
                        })}
                    </div>
                </div>

                {if loading && !has_data {
                    html! {
                        <div class="chart-loading">
                            <p>{"Loading sales data..."}</p>
                        </div>
                    }
                } else if !has_data {
                    html! {
                        <div class="chart-empty">
                            <p>{"No sales data yet - save a receipt to see it here"}</p>
                        </div>
                    }
                } else {
                    html! {
                        <div class="chart-content">
                            <canvas
                                ref={self.canvas_ref.clone()}
                                class="sales-chart-canvas"
                                width="800"
                                height="350"
                            ></canvas>
                        </div>
                    }
                }}
            </div>
        }
    }
}

impl SalesChart {
    fn buckets<'a>(&self, summary: &'a SalesSummaryResponse) -> &'a [SalesBucket] {
        match self.selected_range {
            ChartRange::Daily => &summary.daily,
            ChartRange::Monthly => &summary.monthly,
        }
    }

    /// Short axis label for a bucket: "Aug 07" for days, "2026-08" for months
    fn short_label(&self, label: &str) -> String {
        match self.selected_range {
            ChartRange::Daily => NaiveDate::parse_from_str(label, "%Y-%m-%d")
                .map(|date| date.format("%b %d").to_string())
                .unwrap_or_else(|_| label.to_string()),
            ChartRange::Monthly => label.to_string(),
        }
    }

    fn draw_chart(&self, summary: Option<&SalesSummaryResponse>) {
        let summary = match summary {
            Some(summary) => summary,
            None => return,
        };
        let buckets = self.buckets(summary);
        if buckets.is_empty() {
            return;
        }

        let canvas = match self.canvas_ref.cast::<HtmlCanvasElement>() {
            Some(canvas) => canvas,
            None => return,
        };
        canvas.set_width(800);
        canvas.set_height(350);

        let backend = match CanvasBackend::with_canvas_object(canvas.clone()) {
            Some(backend) => backend,
            None => return,
        };
        let root = backend.into_drawing_area();
        if root.fill(&WHITE).is_err() {
            return;
        }

        let max_value = buckets
            .iter()
            .map(|b| b.paid_total.max(b.pending_total))
            .fold(0.0f64, f64::max)
            .max(1.0);
        let y_max = max_value * 1.1;
        let x_max = (buckets.len() - 1).max(1) as f64;

        let labels: Vec<String> = buckets.iter().map(|b| self.short_label(&b.label)).collect();

        let mut chart = match ChartBuilder::on(&root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        {
            Ok(chart) => chart,
            Err(_) => return,
        };

        if chart
            .configure_mesh()
            .y_desc("Revenue")
            .x_desc("Period")
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_label_formatter(&|v| {
                let index = v.round() as usize;
                labels.get(index).cloned().unwrap_or_default()
            })
            .label_style(("sans-serif", 12, &RGBColor(71, 85, 105)))
            .axis_style(&RGBColor(230, 230, 230))
            .bold_line_style(&RGBColor(245, 245, 245))
            .light_line_style(&RGBColor(250, 250, 250))
            .x_labels(6)
            .y_labels(8)
            .draw()
            .is_err()
        {
            return;
        }

        for (series, color) in [
            (
                buckets.iter().map(|b| b.paid_total).collect::<Vec<f64>>(),
                PAID_COLOR,
            ),
            (
                buckets.iter().map(|b| b.pending_total).collect::<Vec<f64>>(),
                PENDING_COLOR,
            ),
        ] {
            if chart
                .draw_series(LineSeries::new(
                    series.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                    color.stroke_width(3),
                ))
                .is_err()
            {
                return;
            }

            for (i, value) in series.iter().enumerate() {
                let _ = chart.draw_series(std::iter::once(Circle::new(
                    (i as f64, *value),
                    3,
                    color.filled(),
                )));
            }
        }

        let _ = root.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(label: &str, paid: f64, pending: f64) -> SalesBucket {
        SalesBucket {
            label: label.to_string(),
            paid_total: paid,
            pending_total: pending,
            receipt_count: 1,
        }
    }

    #[test]
    fn test_short_label_formats_days() {
        let chart = SalesChart {
            canvas_ref: NodeRef::default(),
            selected_range: ChartRange::Daily,
        };
        assert_eq!(chart.short_label("2026-08-07"), "Aug 07");
        // Malformed labels pass through untouched
        assert_eq!(chart.short_label("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_short_label_keeps_months() {
        let chart = SalesChart {
            canvas_ref: NodeRef::default(),
            selected_range: ChartRange::Monthly,
        };
        assert_eq!(chart.short_label("2026-08"), "2026-08");
    }

    #[test]
    fn test_bucket_selection_follows_range() {
        let summary = SalesSummaryResponse {
            daily: vec![bucket("2026-08-07", 100.0, 0.0)],
            monthly: vec![bucket("2026-08", 100.0, 0.0), bucket("2026-07", 50.0, 25.0)],
            paid_total: 150.0,
            pending_total: 25.0,
            receipt_count: 3,
        };

        let mut chart = SalesChart {
            canvas_ref: NodeRef::default(),
            selected_range: ChartRange::Daily,
        };
        assert_eq!(chart.buckets(&summary).len(), 1);
        chart.selected_range = ChartRange::Monthly;
        assert_eq!(chart.buckets(&summary).len(), 2);
    }

    #[test]
    fn test_draw_chart_handles_missing_canvas() {
        let chart = SalesChart {
            canvas_ref: NodeRef::default(),
            selected_range: ChartRange::Daily,
        };
        // No canvas mounted; must be a no-op rather than a panic
        chart.draw_chart(None);
        chart.draw_chart(Some(&SalesSummaryResponse {
            daily: vec![],
            monthly: vec![],
            paid_total: 0.0,
            pending_total: 0.0,
            receipt_count: 0,
        }));
    }
}

// Integration tests that require wasm-bindgen-test
#[cfg(test)]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_draw_chart_in_browser_without_mounted_canvas() {
        let chart = SalesChart {
            canvas_ref: NodeRef::default(),
            selected_range: ChartRange::Monthly,
        };
        chart.draw_chart(None);
    }
}
