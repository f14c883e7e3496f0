use common::{Game, GameListResult, Genre};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
     let base_url = std::env::var("CATALOG_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
     let api = format!("{}/api/v1/catalog", base_url.trim_end_matches('/'));
     let client = reqwest::Client::new();

     let genres: Vec<Genre> = client
          .get(format!("{api}/genres"))
          .send()
          .await?
          .error_for_status()?
          .json()
          .await?;
     println!("Genres: {:?}", genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>());

     println!("\n--- Testing create_game ---");

     let genre_refs: Vec<_> = genres.iter().take(2).map(|g| json!({ "id": g.id })).collect();
     let created: Game = client
          .post(format!("{api}/games"))
          .json(&json!({
               "title": "The Legend of Zelda: Breath of the Wild",
               "description": "Open-air adventure",
               "developer": "Nintendo EPD",
               "publisher": "Nintendo",
               "release_date": "2017-03-03",
               "price": 59.99,
               "average_rating": 4.9,
               "genres": genre_refs,
          }))
          .send()
          .await?
          .error_for_status()?
          .json()
          .await?;
     println!("Created game: {:?}", created);

     println!("\n--- Testing list_games ---");

     let page: GameListResult = client
          .get(format!("{api}/games"))
          .query(&[("title", "zelda"), ("sort_by", "created_at"), ("sort_order", "desc")])
          .send()
          .await?
          .error_for_status()?
          .json()
          .await?;
     println!(
          "Found {} game(s), page {}/{}",
          page.total_count, page.page, page.total_pages
     );

     let fetched: Game = client
          .get(format!("{api}/games/{}", created.id))
          .send()
          .await?
          .error_for_status()?
          .json()
          .await?;
     println!("Fetched game: {} (created {})", fetched.title, fetched.created_at);

     Ok(())
}
