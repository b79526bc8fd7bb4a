pub mod bowler_table;
pub mod capture;
pub mod cell_tone;
pub mod charts;
pub mod cli;
pub mod config;
pub mod deck_export;
pub mod deck_pdf;
pub mod deck_pptx;
pub mod export_route;
pub mod field_maps;
pub mod http_client;
pub mod nba_insights;
pub mod notes;
pub mod render;
pub mod selection;
pub mod slide_loader;
pub mod state;
pub mod stats_fetch;
pub mod stats_workbook;
pub mod strike_zones;
pub mod venue_tables;
