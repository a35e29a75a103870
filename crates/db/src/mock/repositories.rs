use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use roombook_core::{
    errors::BookingResult,
    models::{
        customer::{Customer, NewCustomer},
        reservation::{ConflictDescriptor, Reservation, ReservationRecord, ReservationStatus},
        room::RoomStore,
        time_slot::SlotTime,
    },
    store::ReservationStore,
};
use uuid::Uuid;

// Stand-in for `PgReservationStore` in handler tests.
mock! {
    pub StoreRepo {}

    #[async_trait]
    impl ReservationStore for StoreRepo {
        async fn find_overlapping(
            &self,
            date: NaiveDate,
            start: SlotTime,
            end: SlotTime,
        ) -> BookingResult<Vec<ConflictDescriptor>>;

        async fn insert_customer(&self, customer: &NewCustomer) -> BookingResult<Customer>;

        async fn insert_reservation(
            &self,
            record: &ReservationRecord,
        ) -> BookingResult<Reservation>;

        async fn list_reservations(&self) -> BookingResult<Vec<Reservation>>;

        async fn get_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>>;

        async fn update_status(
            &self,
            id: Uuid,
            status: ReservationStatus,
        ) -> BookingResult<Option<Reservation>>;

        async fn get_room_store(&self, id: Uuid) -> BookingResult<Option<RoomStore>>;
    }
}
