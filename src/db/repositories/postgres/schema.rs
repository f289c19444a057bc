// Table definitions matching migrations/.

diesel::table! {
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        default_currency -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    expense_categories (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        color -> Nullable<Text>,
        icon -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[sql_name = "type"]
        kind -> Text,
        amount -> Numeric,
        description -> Nullable<Text>,
        transaction_date -> Timestamptz,
        category_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(expense_categories -> users (user_id));
diesel::joinable!(transactions -> expense_categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(users, expense_categories, transactions);
