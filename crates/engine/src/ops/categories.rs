use sea_orm::{ActiveValue, ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{Category, EngineError, ResultEngine, categories, util::normalize_required_name};

use super::{Engine, with_tx};

pub(super) async fn require_category<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
) -> ResultEngine<categories::Model> {
    categories::Entity::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("category {category_id} not exists")))
}

impl Engine {
    pub async fn new_category(&self, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            let model = categories::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    pub async fn category(&self, category_id: i64) -> ResultEngine<Category> {
        let model = require_category(&self.database, category_id).await?;
        Ok(Category::from(model))
    }

    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }
}
