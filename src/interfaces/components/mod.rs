pub mod price_chart;
