//! Interactive dashboard session: render, prompt, act, repeat.

use anyhow::Result;
use inquire::{Select, Text};
use std::sync::Arc;
use std::time::Duration;

use skycast_core::{Config, FavoritesStore, OpenMeteoClient, SearchController, WeatherViewModel};

use crate::ui;

pub async fn run(config: Config, client: OpenMeteoClient) -> Result<()> {
    let client = Arc::new(client);
    let vm = WeatherViewModel::new(
        client.clone(),
        config.default_location.clone(),
        config.default_unit,
    );
    let search = SearchController::new(
        client,
        Duration::from_millis(config.debounce_ms),
        config.max_suggestions,
    );
    let mut store = FavoritesStore::open(Config::favorites_file_path()?, config.max_favorites);

    vm.refresh().await;

    loop {
        // Pick up favorites written by another skycast process.
        store.refresh();

        let snapshot = vm.snapshot();
        let is_favorite = store.is_favorite(&snapshot.location);
        println!("\n{}", ui::render_dashboard(&snapshot, store.len(), is_favorite));

        let favorites_label = format!("Favorites ({})", store.len());
        let favorite_label = if is_favorite { "Remove favorite" } else { "Add favorite" };
        let toggle_label = format!("Switch to {}", snapshot.unit.toggled().symbol());
        let options = vec![
            "Search city",
            favorites_label.as_str(),
            favorite_label,
            toggle_label.as_str(),
            "Refresh",
            "Quit",
        ];

        let Some(choice) = Select::new("What next?", options).prompt_skippable()? else {
            break;
        };

        match choice {
            "Search city" => search_flow(&search, &vm).await?,
            "Add favorite" => {
                store.add(snapshot.location.clone());
            }
            "Remove favorite" => {
                store.remove(&snapshot.location);
            }
            "Refresh" => vm.refresh().await,
            "Quit" => break,
            c if c == favorites_label => favorites_flow(&mut store, &vm).await?,
            c if c == toggle_label => {
                vm.toggle_unit().await;
            }
            _ => {}
        }
    }

    Ok(())
}

async fn search_flow(search: &SearchController, vm: &WeatherViewModel) -> Result<()> {
    let Some(query) = Text::new("City:").prompt_skippable()? else {
        return Ok(());
    };

    search.on_input(&query);
    search.flush().await;

    let snapshot = search.snapshot();
    if snapshot.error.is_some() || snapshot.candidates.is_empty() {
        let rendered = ui::render_suggestions(&snapshot);
        if rendered.is_empty() {
            println!("No matches.");
        } else {
            println!("{rendered}");
        }
        return Ok(());
    }

    let names: Vec<String> = snapshot.candidates.iter().map(|c| c.name.clone()).collect();
    let Some(pick) = Select::new("Pick a place:", names.clone()).prompt_skippable()? else {
        return Ok(());
    };
    let index = names.iter().position(|name| *name == pick).unwrap_or(0);

    if let Some(location) = search.select(index) {
        vm.set_location(location).await;
    }
    Ok(())
}

async fn favorites_flow(store: &mut FavoritesStore, vm: &WeatherViewModel) -> Result<()> {
    if store.is_empty() {
        println!("No favorites saved yet.");
        return Ok(());
    }

    let names: Vec<String> = store.list().iter().map(|fav| fav.name.clone()).collect();
    let Some(pick) = Select::new("Favorites:", names.clone()).prompt_skippable()? else {
        return Ok(());
    };
    let index = names.iter().position(|name| *name == pick).unwrap_or(0);

    let location = store.list()[index].clone();
    vm.set_location(location).await;
    Ok(())
}
