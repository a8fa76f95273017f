//! Populates the database with demo users and a PC-hardware catalog.

use anyhow::Result;
use dotenv::dotenv;
use hardware_store_api::data::postgres::{PgProductRepository, PgUserRepository, init_schema};
use hardware_store_api::domain::models::Product;
use hardware_store_api::domain::repository::{ProductRepository, UserRepository};
use hardware_store_api::domain::user::User;
use hardware_store_api::infrastructure::config::AppConfig;
use hardware_store_api::infrastructure::logging::init_logging;
use hardware_store_api::infrastructure::security::hash_password;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const DEFAULT_PASSWORD: &str = "password123";

async fn seed_users(repo: &PgUserRepository) -> Result<usize> {
    if repo.find_user_by_email("test@example.com").await?.is_some() {
        info!("Users already seeded, skipping");
        return Ok(0);
    }

    // One hash shared across demo accounts; hashing is the slow part.
    let password_hash =
        hash_password(DEFAULT_PASSWORD).map_err(|e| anyhow::anyhow!("hash failed: {e}"))?;

    let users = [
        ("john_doe", "john.doe@example.com", Some("+1234567890")),
        ("jane_smith", "jane.smith@example.com", Some("+1234567891")),
        ("alice_johnson", "alice.johnson@example.com", None),
        ("mike_brown", "mike.brown@example.com", Some("+1234567894")),
        ("sarah_davis", "sarah.davis@example.com", Some("+1234567895")),
        ("testuser", "test@example.com", Some("+1234567896")),
    ];

    for (username, email, phone) in users {
        repo.save_user(User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.clone(),
            phone: phone.map(str::to_string),
        })
        .await?;
    }

    Ok(users.len())
}

struct SeedProduct {
    name: &'static str,
    quantity: i32,
    description: &'static str,
    category: &'static str,
    price: i64,
}

async fn seed_products(repo: &PgProductRepository) -> Result<usize> {
    if !repo.list_all().await?.is_empty() {
        info!("Products already seeded, skipping");
        return Ok(0);
    }

    let catalog = [
        SeedProduct {
            name: "NVIDIA GeForce RTX 4090",
            quantity: 15,
            description: "The ultimate GPU for 4K gaming and content creation. 24GB GDDR6X memory, ray tracing, DLSS 3.0 support.",
            category: "GPU",
            price: 159999,
        },
        SeedProduct {
            name: "NVIDIA GeForce RTX 4080",
            quantity: 25,
            description: "High-performance gaming GPU with 16GB GDDR6X memory, perfect for 1440p and 4K gaming.",
            category: "GPU",
            price: 119999,
        },
        SeedProduct {
            name: "AMD Radeon RX 7900 XTX",
            quantity: 20,
            description: "AMD flagship GPU with 24GB GDDR6 memory, excellent for high-resolution gaming and workloads.",
            category: "GPU",
            price: 99999,
        },
        SeedProduct {
            name: "NVIDIA GeForce RTX 4060",
            quantity: 40,
            description: "Mid-range GPU perfect for 1080p gaming with ray tracing and DLSS support.",
            category: "GPU",
            price: 29999,
        },
        SeedProduct {
            name: "Intel Core i9-13900K",
            quantity: 30,
            description: "24-core processor with 32 threads, 5.8GHz boost clock. Perfect for gaming and productivity.",
            category: "CPU",
            price: 58999,
        },
        SeedProduct {
            name: "AMD Ryzen 9 7950X",
            quantity: 25,
            description: "16-core, 32-thread processor with 5.7GHz boost. Excellent for content creation and gaming.",
            category: "CPU",
            price: 69999,
        },
        SeedProduct {
            name: "AMD Ryzen 7 7700X",
            quantity: 30,
            description: "8-core, 16-thread processor with 5.4GHz boost. Perfect for gaming and streaming.",
            category: "CPU",
            price: 39999,
        },
        SeedProduct {
            name: "ASUS ROG Strix Z790-E Gaming",
            quantity: 20,
            description: "Premium Intel Z790 motherboard with WiFi 6E, PCIe 5.0, DDR5 support.",
            category: "Motherboard",
            price: 49999,
        },
        SeedProduct {
            name: "MSI MAG B650 Tomahawk WiFi",
            quantity: 25,
            description: "AMD B650 motherboard with WiFi 6, PCIe 4.0, perfect for Ryzen 7000 series.",
            category: "Motherboard",
            price: 24999,
        },
        SeedProduct {
            name: "Corsair Vengeance DDR5-5600 32GB",
            quantity: 50,
            description: "32GB (2x16GB) DDR5 memory kit with 5600MHz speed, optimized for Intel and AMD.",
            category: "RAM",
            price: 17999,
        },
        SeedProduct {
            name: "G.Skill Trident Z5 DDR5-6000 16GB",
            quantity: 40,
            description: "16GB (2x8GB) high-speed DDR5 memory with RGB lighting.",
            category: "RAM",
            price: 12999,
        },
        SeedProduct {
            name: "Samsung 980 PRO 2TB NVMe SSD",
            quantity: 35,
            description: "PCIe 4.0 NVMe SSD with 7000MB/s read speeds, perfect for gaming and professional work.",
            category: "Storage",
            price: 19999,
        },
        SeedProduct {
            name: "Seagate Barracuda 4TB HDD",
            quantity: 30,
            description: "4TB traditional hard drive for mass storage, 7200 RPM, 256MB cache.",
            category: "Storage",
            price: 8999,
        },
        SeedProduct {
            name: "Corsair RM850x 850W 80+ Gold",
            quantity: 25,
            description: "Fully modular 850W power supply with 80+ Gold efficiency and 10-year warranty.",
            category: "PSU",
            price: 13999,
        },
    ];

    for item in &catalog {
        repo.save(Product {
            id: Uuid::new_v4(),
            name: item.name.to_string(),
            quantity: item.quantity,
            description: Some(item.description.to_string()),
            category: item.category.to_string(),
            photo: None,
            price: item.price,
        })
        .await?;
    }

    Ok(catalog.len())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = PgPool::connect(&config.database_url).await?;
    init_schema(&pool).await?;

    info!("Starting database seeding");
    let users = seed_users(&PgUserRepository::new(pool.clone())).await?;
    let products = seed_products(&PgProductRepository::new(pool)).await?;
    info!(
        users = users,
        products = products,
        default_password = DEFAULT_PASSWORD,
        "Seeding completed"
    );
    Ok(())
}
