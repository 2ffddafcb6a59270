// 統合テスト - 公開APIのみを通して集計の不変条件を検証

mod concurrency;
mod end_to_end;
mod fixtures;
mod properties;
