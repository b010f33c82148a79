//! # Seed Data Generator
//!
//! Populates the database with test books and a default admin account
//! for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 books (default)
//! cargo run -p kitab-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p kitab-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p kitab-db --bin seed -- --db ./data/kitabcart.db
//! ```
//!
//! ## Generated Books
//! Creates title/author combinations across categories (fiction, history,
//! science, poetry, children), each with:
//! - Random price: $4.99 - $39.99
//! - Random stock: 0 - 60

use std::env;

use kitab_db::{Database, DbConfig, NewBook};

/// Book categories with representative titles
const CATEGORIES: &[(&str, &[(&str, &str)])] = &[
    (
        "Fiction",
        &[
            ("The Kite Runner", "Khaled Hosseini"),
            ("A Thousand Splendid Suns", "Khaled Hosseini"),
            ("Things Fall Apart", "Chinua Achebe"),
            ("One Hundred Years of Solitude", "Gabriel García Márquez"),
            ("Beloved", "Toni Morrison"),
            ("The Remains of the Day", "Kazuo Ishiguro"),
            ("My Brilliant Friend", "Elena Ferrante"),
            ("Snow", "Orhan Pamuk"),
        ],
    ),
    (
        "History",
        &[
            ("Guns, Germs, and Steel", "Jared Diamond"),
            ("SPQR", "Mary Beard"),
            ("The Silk Roads", "Peter Frankopan"),
            ("A People's History", "Howard Zinn"),
            ("1491", "Charles C. Mann"),
            ("The Ottoman Centuries", "Lord Kinross"),
        ],
    ),
    (
        "Science",
        &[
            ("A Brief History of Time", "Stephen Hawking"),
            ("The Selfish Gene", "Richard Dawkins"),
            ("Cosmos", "Carl Sagan"),
            ("The Gene", "Siddhartha Mukherjee"),
            ("Entangled Life", "Merlin Sheldrake"),
            ("Why We Sleep", "Matthew Walker"),
        ],
    ),
    (
        "Poetry",
        &[
            ("The Essential Rumi", "Jalal al-Din Rumi"),
            ("Leaves of Grass", "Walt Whitman"),
            ("Milk and Honey", "Rupi Kaur"),
            ("The Sun and Her Flowers", "Rupi Kaur"),
            ("Selected Poems", "Faiz Ahmed Faiz"),
        ],
    ),
    (
        "Children",
        &[
            ("Charlotte's Web", "E. B. White"),
            ("Matilda", "Roald Dahl"),
            ("The Little Prince", "Antoine de Saint-Exupéry"),
            ("Where the Wild Things Are", "Maurice Sendak"),
            ("The Very Hungry Caterpillar", "Eric Carle"),
        ],
    ),
];

/// Deterministic pseudo-random number in [0, max) from an index.
/// Keeps seeding reproducible without pulling in a rand dependency.
fn pseudo_random(index: usize, salt: u64, max: u64) -> u64 {
    let mut x = (index as u64).wrapping_mul(6364136223846793005).wrapping_add(salt);
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51afd7ed558ccd);
    x ^= x >> 33;
    x % max
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./kitabcart_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("KitabCart Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of books to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./kitabcart_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Seeding {} books into {}", count, db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let books = db.books();

    let mut inserted = 0usize;
    'outer: for round in 0.. {
        for (category, titles) in CATEGORIES {
            for (title, author) in *titles {
                if inserted >= count {
                    break 'outer;
                }

                let title = if round == 0 {
                    title.to_string()
                } else {
                    // Later rounds get edition suffixes to stay distinguishable
                    format!("{} ({}th printing)", title, round + 1)
                };

                // Price $4.99 - $39.99, stock 0 - 60
                let price_cents = 499 + pseudo_random(inserted, 17, 3500) as i64;
                let stock = pseudo_random(inserted, 91, 61) as i64;

                books
                    .create(NewBook {
                        title,
                        author: author.to_string(),
                        description: Some(format!("A well-loved {} title.", category.to_lowercase())),
                        category: Some(category.to_string()),
                        price_cents,
                        stock,
                        image_url: None,
                    })
                    .await?;

                inserted += 1;
                if inserted % 50 == 0 {
                    println!("  {} / {} books", inserted, count);
                }
            }
        }
    }

    println!("Done: {} books inserted", inserted);
    Ok(())
}
